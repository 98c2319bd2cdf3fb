//! # Configuration Module
//!
//! Resolves where pif keeps its state. Everything lives directly in the
//! user's home directory:
//!
//! - `~/.pif` - the song list
//! - `~/.pif-config` - rotation state (`songs_per_day`, `last_played`)
//! - `~/.pif_last_practice_<song>` - per-song practice markers
//! - `~/.local/bin/install-pif-notify.sh` - notification service installer
//!
//! Each location can be overridden from the command line or the environment
//! (`PIF_FILE`, `PIF_CONFIG`, `PIF_MARKER_DIR`), which is also how the tests
//! keep away from the real home directory.

use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SONG_FILE_NAME: &str = ".pif";
pub const ROTATION_FILE_NAME: &str = ".pif-config";
pub const INSTALL_SCRIPT: &str = ".local/bin/install-pif-notify.sh";

/// Returns the current user's home directory.
///
/// # Errors
///
/// Fails when the platform cannot report a home directory.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine the home directory. Set PIF_FILE and PIF_CONFIG explicitly."
        )
    })
}

/// Resolved file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Song list
    pub song_file: PathBuf,
    /// Rotation state
    pub rotation_file: PathBuf,
    /// Directory holding the practice markers
    pub marker_dir: PathBuf,
    /// Installer run by `install-service`
    pub install_script: PathBuf,
}

impl RuntimeConfig {
    /// Default locations under the home directory.
    pub fn new() -> Result<Self> {
        Ok(Self::in_dir(&get_home_dir()?))
    }

    /// Lays out every file under `dir` as if it were the home directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            song_file: dir.join(SONG_FILE_NAME),
            rotation_file: dir.join(ROTATION_FILE_NAME),
            marker_dir: dir.to_path_buf(),
            install_script: dir.join(INSTALL_SCRIPT),
        }
    }

    /// Applies command-line / environment overrides on top of the defaults.
    /// Home is only consulted when at least one location is not overridden.
    pub fn with_overrides(
        song_file: Option<&Path>,
        rotation_file: Option<&Path>,
        marker_dir: Option<&Path>,
    ) -> Result<Self> {
        let mut config = match (song_file, rotation_file, marker_dir) {
            (Some(_), Some(_), Some(marker_dir)) => Self::in_dir(&absolute(marker_dir)?),
            _ => Self::new()?,
        };

        if let Some(path) = song_file {
            config.song_file = absolute(path)?;
        }
        if let Some(path) = rotation_file {
            config.rotation_file = absolute(path)?;
        }
        if let Some(path) = marker_dir {
            config.marker_dir = absolute(path)?;
        }

        log::debug!("Resolved runtime config: {config:?}");
        Ok(config)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    let resolved = path
        .absolutize()
        .with_context(|| format!("Failed to resolve path {}", path.display()))?;
    Ok(resolved.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_layout() {
        let config = RuntimeConfig::in_dir(Path::new("/home/player"));
        assert_eq!(config.song_file, PathBuf::from("/home/player/.pif"));
        assert_eq!(config.rotation_file, PathBuf::from("/home/player/.pif-config"));
        assert_eq!(config.marker_dir, PathBuf::from("/home/player"));
        assert_eq!(
            config.install_script,
            PathBuf::from("/home/player/.local/bin/install-pif-notify.sh")
        );
    }

    #[test]
    fn test_overrides_are_absolute() {
        let config = RuntimeConfig::with_overrides(
            Some(Path::new("songs.txt")),
            Some(Path::new("/tmp/rotation")),
            Some(Path::new("markers")),
        )
        .expect("overrides should resolve");

        assert!(config.song_file.is_absolute());
        assert!(config.song_file.ends_with("songs.txt"));
        assert_eq!(config.rotation_file, PathBuf::from("/tmp/rotation"));
        assert!(config.marker_dir.is_absolute());
        assert!(config.marker_dir.ends_with("markers"));
    }

    #[test]
    fn test_default_paths_live_in_home() {
        if let Ok(home) = get_home_dir() {
            let config = RuntimeConfig::new().expect("home is known");
            assert_eq!(config.song_file, home.join(".pif"));
            assert_eq!(config.marker_dir, home);
        }
    }
}
