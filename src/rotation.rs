//! Rotation state and its `key=value` file.
//!
//! The file holds exactly two lines:
//!
//! ```text
//! songs_per_day=3
//! last_played=0
//! ```

use crate::store::write_private;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_SONGS_PER_DAY: usize = 3;

/// Round-robin cursor carried from one run to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    /// How many rotation songs to pick per day
    pub songs_per_day: usize,
    /// Index into the rotation pool where the next pick starts
    pub last_played: usize,
}

impl Default for RotationState {
    fn default() -> Self {
        Self {
            songs_per_day: DEFAULT_SONGS_PER_DAY,
            last_played: 0,
        }
    }
}

impl RotationState {
    pub fn new(songs_per_day: usize, last_played: usize) -> Self {
        Self {
            songs_per_day,
            last_played,
        }
    }

    /// Parses the config file body. Lines that are missing or malformed
    /// leave the matching field at its default.
    pub fn parse(content: &str) -> Self {
        let mut state = Self::default();

        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "songs_per_day" => match value.parse::<usize>() {
                    Ok(n) if n > 0 => state.songs_per_day = n,
                    _ => warn!("Ignoring invalid songs_per_day `{value}'"),
                },
                "last_played" => match value.parse::<usize>() {
                    Ok(n) => state.last_played = n,
                    Err(_) => warn!("Ignoring invalid last_played `{value}'"),
                },
                other => debug!("Ignoring unknown rotation key `{other}'"),
            }
        }

        state
    }

    /// Renders the two-line file body.
    pub fn render(&self) -> String {
        format!(
            "songs_per_day={}\nlast_played={}\n",
            self.songs_per_day, self.last_played
        )
    }
}

/// Reads and writes [`RotationState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct RotationStore {
    path: PathBuf,
}

impl RotationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<RotationState> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(RotationState::parse(&content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(
                    "Rotation config {} not found, using defaults",
                    self.path.display()
                );
                Ok(RotationState::default())
            }
            Err(e) => Err(e).with_context(|| {
                format!("Failed to open rotation config {}", self.path.display())
            }),
        }
    }

    /// Overwrites the file with `state`.
    pub fn save(&self, state: &RotationState) -> Result<()> {
        write_private(&self.path, &state.render())?;
        debug!("Saved rotation state {state:?} to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = RotationStore::new(dir.path().join(".pif-config"));
        assert_eq!(store.load().unwrap(), RotationState::new(3, 0));
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = RotationStore::new(dir.path().join(".pif-config"));

        store.save(&RotationState::new(5, 2)).unwrap();

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "songs_per_day=5\nlast_played=2\n"
        );
        assert_eq!(store.load().unwrap(), RotationState::new(5, 2));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        assert_eq!(
            RotationState::parse("last_played=4\n"),
            RotationState::new(3, 4)
        );
        assert_eq!(
            RotationState::parse("songs_per_day=7\n"),
            RotationState::new(7, 0)
        );
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let state = RotationState::parse(
            "songs_per_day=zero\nlast_played=-1\ngarbage\ncolour=blue\n",
        );
        assert_eq!(state, RotationState::default());
        assert_eq!(RotationState::parse("songs_per_day=0\n").songs_per_day, 3);
    }
}
