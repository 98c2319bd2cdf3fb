//! # Notifier
//!
//! Works out what is due today, reports it, and moves the rotation cursor
//! forward. This is what the notification service runs once a day:
//!
//! ```bash
//! pif due --notify
//! ```
//!
//! Every run that is not a dry run saves the rotation state, so running it
//! twice on one day hands out the next batch of rotation songs.

use crate::marker::PracticeMarkers;
use crate::rotation::RotationStore;
use crate::scheduler::{plan_day, DuePlan};
use crate::store::SongStore;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::fmt::Write as _;
use std::io::Write;
use std::process::Command;
use std::time::SystemTime;

pub const NOTIFICATION_TITLE: &str = "Practice time";

/// Flags for one notifier run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueOptions {
    /// Leave the rotation cursor where it is
    pub dry_run: bool,
    /// Print the plan as JSON
    pub json: bool,
    /// Also raise a desktop notification
    pub notify: bool,
}

/// Delivers a short message to the user.
pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Desktop notifications via `notify-send`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        let output = Command::new("notify-send")
            .args(["--app-name=pif", title, body])
            .output()
            .context("Failed to execute 'notify-send'")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("notify-send failed: {}", stderr.trim());
        }
        Ok(())
    }
}

/// Computes today's plan and, unless `dry_run` is set, persists the advanced
/// rotation cursor. Output goes to `out`; `notifier` is only used when
/// `options.notify` is set and something is due, after the state is saved.
/// A failed notification is logged, not returned.
pub fn run_due<W: Write>(
    songs: &SongStore,
    rotation: &RotationStore,
    markers: &PracticeMarkers,
    now: SystemTime,
    options: DueOptions,
    notifier: &dyn Notifier,
    out: &mut W,
) -> Result<DuePlan> {
    let records = songs.records()?;
    let state = rotation.load()?;
    debug!("Planning {} songs with rotation state {state:?}", records.len());

    let plan = plan_day(&records, state, now, markers);

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &plan).context("Failed to serialize due plan")?;
        writeln!(out)?;
    } else {
        out.write_all(render_plan(&plan).as_bytes())?;
    }

    if options.dry_run {
        info!("Dry run, rotation state left at {state:?}");
    } else {
        rotation.save(&plan.next_state)?;
    }

    // The plan is already out and the cursor saved; a missing session bus
    // must not turn the daily run into a failure.
    if options.notify && !plan.is_empty() {
        if let Err(e) = notifier.notify(NOTIFICATION_TITLE, &notification_body(&plan)) {
            warn!("Desktop notification failed: {e:#}");
        }
    }

    Ok(plan)
}

/// Human-readable plan.
pub fn render_plan(plan: &DuePlan) -> String {
    if plan.is_empty() {
        return "Nothing due today.\n".to_string();
    }

    let mut text = String::from("Songs to practice today:\n");
    if !plan.rotation.is_empty() {
        text.push_str("Rotation:\n");
        for song in &plan.rotation {
            let _ = writeln!(text, "  - {}", song.name);
        }
    }
    if !plan.frequency.is_empty() {
        text.push_str("Due by frequency:\n");
        for song in &plan.frequency {
            match song.frequency() {
                Some(1) => {
                    let _ = writeln!(text, "  - {} (daily)", song.name);
                }
                Some(days) => {
                    let _ = writeln!(text, "  - {} (every {days} days)", song.name);
                }
                None => {
                    let _ = writeln!(text, "  - {}", song.name);
                }
            }
        }
    }
    text
}

fn notification_body(plan: &DuePlan) -> String {
    plan.song_names().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::RotationState;
    use crate::song::SongRecord;
    use std::cell::RefCell;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: RefCell<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str) -> Result<()> {
            self.sent
                .borrow_mut()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    struct Fixture {
        _dir: TempDir,
        songs: SongStore,
        rotation: RotationStore,
        markers: PracticeMarkers,
    }

    fn fixture(song_file: &str) -> Fixture {
        let dir = TempDir::new().unwrap();
        let songs = SongStore::new(dir.path().join(".pif"));
        fs::write(songs.path(), song_file).unwrap();
        Fixture {
            rotation: RotationStore::new(dir.path().join(".pif-config")),
            markers: PracticeMarkers::new(dir.path()),
            songs,
            _dir: dir,
        }
    }

    #[test]
    fn test_due_advances_rotation_and_reports() {
        let fx = fixture("a rot\nb rot\nc rot\nd 7\n");
        fx.rotation.save(&RotationState::new(2, 0)).unwrap();
        let notifier = RecordingNotifier::default();
        let mut out = Vec::new();

        let plan = run_due(
            &fx.songs,
            &fx.rotation,
            &fx.markers,
            SystemTime::now(),
            DueOptions {
                notify: true,
                ..Default::default()
            },
            &notifier,
            &mut out,
        )
        .unwrap();

        assert_eq!(plan.song_names(), ["a", "b", "d"]);
        assert_eq!(fx.rotation.load().unwrap(), RotationState::new(2, 2));

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rotation:\n  - a\n  - b\n"));
        assert!(text.contains("  - d (every 7 days)"));

        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "a, b, d");
    }

    #[test]
    fn test_dry_run_keeps_state() {
        let fx = fixture("a rot\nb rot\n");
        fx.rotation.save(&RotationState::new(1, 1)).unwrap();
        let mut out = Vec::new();

        run_due(
            &fx.songs,
            &fx.rotation,
            &fx.markers,
            SystemTime::now(),
            DueOptions {
                dry_run: true,
                ..Default::default()
            },
            &RecordingNotifier::default(),
            &mut out,
        )
        .unwrap();

        assert_eq!(fx.rotation.load().unwrap(), RotationState::new(1, 1));
    }

    struct FailingNotifier;

    impl Notifier for FailingNotifier {
        fn notify(&self, _title: &str, _body: &str) -> Result<()> {
            Err(anyhow::anyhow!("no session bus"))
        }
    }

    #[test]
    fn test_failed_notification_still_advances_rotation() {
        let fx = fixture("a rot\nb rot\nc rot\n");
        fx.rotation.save(&RotationState::new(1, 0)).unwrap();
        let options = DueOptions {
            notify: true,
            ..Default::default()
        };

        for (expected, cursor) in [("a", 1), ("b", 2), ("c", 0)] {
            let mut out = Vec::new();
            let plan = run_due(
                &fx.songs,
                &fx.rotation,
                &fx.markers,
                SystemTime::now(),
                options,
                &FailingNotifier,
                &mut out,
            )
            .unwrap();

            assert_eq!(plan.song_names(), [expected]);
            assert!(String::from_utf8(out)
                .unwrap()
                .contains(&format!("Rotation:\n  - {expected}\n")));
            assert_eq!(fx.rotation.load().unwrap(), RotationState::new(1, cursor));
        }
    }

    #[test]
    fn test_practiced_song_not_due() {
        let fx = fixture("d 7\n");
        let now = SystemTime::now();
        fx.markers
            .touch_at("d", now - Duration::from_secs(2 * 86_400))
            .unwrap();
        let notifier = RecordingNotifier::default();
        let mut out = Vec::new();

        let plan = run_due(
            &fx.songs,
            &fx.rotation,
            &fx.markers,
            now,
            DueOptions {
                notify: true,
                ..Default::default()
            },
            &notifier,
            &mut out,
        )
        .unwrap();

        assert!(plan.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "Nothing due today.\n");
        assert!(notifier.sent.borrow().is_empty());
    }

    #[test]
    fn test_json_output() {
        let fx = fixture("a rot\nb 1\n");
        let mut out = Vec::new();

        run_due(
            &fx.songs,
            &fx.rotation,
            &fx.markers,
            SystemTime::now(),
            DueOptions {
                json: true,
                ..Default::default()
            },
            &RecordingNotifier::default(),
            &mut out,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["rotation"][0]["name"], "a");
        assert_eq!(value["frequency"][0]["name"], "b");
        assert_eq!(value["next_state"]["last_played"], 0);
        assert_eq!(value["next_state"]["songs_per_day"], 3);
    }

    #[test]
    fn test_render_plan_daily() {
        let plan = DuePlan {
            rotation: Vec::new(),
            frequency: vec![SongRecord::parse_line("scales 1")],
            next_state: RotationState::default(),
        };
        assert_eq!(
            render_plan(&plan),
            "Songs to practice today:\nDue by frequency:\n  - scales (daily)\n"
        );
    }
}
