//! Practice markers.
//!
//! A song's last practice time is the modification time of an empty file
//! `.pif_last_practice_<name>` in the marker directory (home by default).

use crate::scheduler::PracticeLog;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const MARKER_PREFIX: &str = ".pif_last_practice_";

/// Marker files in one directory.
#[derive(Debug, Clone)]
pub struct PracticeMarkers {
    dir: PathBuf,
}

impl PracticeMarkers {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Marker path for `song`. Path separators in the name become `_`.
    pub fn path_for(&self, song: &str) -> PathBuf {
        let safe = song.replace(['/', '\\'], "_");
        self.dir.join(format!("{MARKER_PREFIX}{safe}"))
    }

    /// Records a practice session for `song` now.
    pub fn touch(&self, song: &str) -> Result<SystemTime> {
        self.touch_at(song, SystemTime::now())
    }

    /// Creates the marker if needed and sets its mtime to `when`.
    pub fn touch_at(&self, song: &str, when: SystemTime) -> Result<SystemTime> {
        let path = self.path_for(song);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open practice marker {}", path.display()))?;
        file.set_modified(when)
            .with_context(|| format!("Failed to update practice marker {}", path.display()))?;

        info!("Marked `{song}' as practiced");
        Ok(when)
    }
}

impl PracticeLog for PracticeMarkers {
    fn last_practiced(&self, song: &str) -> Option<SystemTime> {
        let path = self.path_for(song);
        match fs::metadata(&path).and_then(|meta| meta.modified()) {
            Ok(modified) => Some(modified),
            Err(e) => {
                debug!("No usable marker at {}: {e}", path.display());
                None
            }
        }
    }
}
