//! Due-song scheduling.
//!
//! Two independent passes decide what to practice today:
//!
//! - **Rotation**: songs tagged `rot` form a pool that is walked round-robin,
//!   `songs_per_day` at a time. The cursor lives in [`RotationState`] and is
//!   returned advanced rather than mutated in place.
//! - **Frequency**: songs tagged with a day count `D` are due once `D` whole
//!   days have passed since they were last practiced, or immediately if they
//!   never were.
//!
//! ```
//! use pif::rotation::RotationState;
//! use pif::scheduler::select_rotation_due;
//! use pif::song::SongRecord;
//!
//! let songs: Vec<_> = ["a rot", "b rot", "c 7", "d rot"]
//!     .iter()
//!     .map(|line| SongRecord::parse_line(line))
//!     .collect();
//!
//! let pick = select_rotation_due(&songs, RotationState::new(2, 1));
//! let names: Vec<_> = pick.songs.iter().map(|s| s.name.as_str()).collect();
//! assert_eq!(names, ["b", "d"]);
//! assert_eq!(pick.next_state.last_played, 0);
//! ```

use crate::rotation::RotationState;
use crate::song::SongRecord;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Source of "last practiced" timestamps.
pub trait PracticeLog {
    /// When `song` was last practiced, or `None` if never.
    fn last_practiced(&self, song: &str) -> Option<SystemTime>;
}

impl PracticeLog for HashMap<String, SystemTime> {
    fn last_practiced(&self, song: &str) -> Option<SystemTime> {
        self.get(song).copied()
    }
}

/// Result of one rotation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPick<'a> {
    pub songs: Vec<&'a SongRecord>,
    pub next_state: RotationState,
}

/// Everything due on one day plus the state to persist afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuePlan {
    pub rotation: Vec<SongRecord>,
    pub frequency: Vec<SongRecord>,
    pub next_state: RotationState,
}

impl DuePlan {
    pub fn is_empty(&self) -> bool {
        self.rotation.is_empty() && self.frequency.is_empty()
    }

    /// Names of all due songs, rotation first.
    pub fn song_names(&self) -> Vec<&str> {
        self.rotation
            .iter()
            .chain(&self.frequency)
            .map(|song| song.name.as_str())
            .collect()
    }
}

/// Picks today's rotation songs starting at the cursor, wrapping around the
/// pool, and returns the cursor moved past them.
#[must_use]
pub fn select_rotation_due(records: &[SongRecord], state: RotationState) -> RotationPick<'_> {
    let pool: Vec<&SongRecord> = records.iter().filter(|r| r.is_rotation()).collect();
    let pool_size = pool.len();

    if pool_size == 0 {
        log::debug!("No rotation songs, cursor stays at {}", state.last_played);
        return RotationPick {
            songs: Vec::new(),
            next_state: state,
        };
    }

    let start = state.last_played % pool_size;
    let count = state.songs_per_day.min(pool_size);

    let songs = (start..start + count)
        .map(|i| pool[i % pool_size])
        .collect();

    let next_state = RotationState {
        last_played: (start + count) % pool_size,
        ..state
    };
    log::debug!(
        "Rotation pool of {pool_size}: picked {count} from {start}, next cursor {}",
        next_state.last_played
    );

    RotationPick { songs, next_state }
}

/// Frequency songs whose interval has elapsed as of `now`. Untagged,
/// rotation and malformed entries are skipped without complaint.
#[must_use]
pub fn select_frequency_due<'a, L>(
    records: &'a [SongRecord],
    now: SystemTime,
    practice: &L,
) -> Vec<&'a SongRecord>
where
    L: PracticeLog + ?Sized,
{
    records
        .iter()
        .filter(|record| match record.frequency() {
            Some(days) => is_frequency_due(&record.name, days, now, practice),
            None => false,
        })
        .collect()
}

fn is_frequency_due<L>(name: &str, days: u32, now: SystemTime, practice: &L) -> bool
where
    L: PracticeLog + ?Sized,
{
    let Some(last) = practice.last_practiced(name) else {
        log::trace!("`{name}' never practiced, due");
        return true;
    };

    // A marker from the future counts as practiced today.
    let elapsed = now.duration_since(last).unwrap_or(Duration::ZERO);
    let elapsed_days = elapsed.as_secs() / SECONDS_PER_DAY;
    log::trace!("`{name}' last practiced {elapsed_days} days ago, every {days}");

    elapsed_days >= u64::from(days)
}

/// Runs both passes for `now`.
pub fn plan_day<L>(
    records: &[SongRecord],
    state: RotationState,
    now: SystemTime,
    practice: &L,
) -> DuePlan
where
    L: PracticeLog + ?Sized,
{
    let pick = select_rotation_due(records, state);
    let frequency = select_frequency_due(records, now, practice);

    DuePlan {
        rotation: pick.songs.into_iter().cloned().collect(),
        frequency: frequency.into_iter().cloned().collect(),
        next_state: pick.next_state,
    }
}
