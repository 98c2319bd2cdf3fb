//! # Song Store
//!
//! The song list is a flat text file, one song per line, in insertion order.
//! The store is the only thing that writes it. Saves always replace the whole
//! file: the new content goes to a temp file in the same directory, which is
//! then renamed over the old one, so a crash never leaves a truncated list.

use crate::song::{validate_name, SongRecord, Tag};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Owner read/write only.
#[cfg(unix)]
const PRIVATE_MODE: u32 = 0o600;

/// Line-oriented store backed by the song file.
#[derive(Debug, Clone)]
pub struct SongStore {
    path: PathBuf,
}

impl SongStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty song file if there is none yet and makes sure the
    /// owner can read and write it. Returns `true` when the file was created.
    pub fn ensure_exists(&self) -> Result<bool> {
        let created = match fs::metadata(&self.path) {
            Ok(_) => false,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("File does not exist. Creating file: {}", self.path.display());
                fs::File::create(&self.path).with_context(|| {
                    format!("Failed to create song file {}", self.path.display())
                })?;
                true
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open song file {}", self.path.display())
                })
            }
        };

        fix_permissions(&self.path, created)?;
        Ok(created)
    }

    /// Raw lines in file order. A missing file is an empty list.
    ///
    /// Lines are split on `\n` only, so a CRLF file keeps its `\r` and saves
    /// back unchanged. A line that is not valid UTF-8 is decoded lossily
    /// instead of failing the whole list.
    pub fn load(&self) -> Result<Vec<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Song file {} not found, treating as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open song file {} for reading", self.path.display())
                })
            }
        };

        let mut raw_lines: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
        if raw_lines.last().is_some_and(|last| last.is_empty()) {
            raw_lines.pop();
        }

        Ok(raw_lines
            .into_iter()
            .enumerate()
            .map(|(index, raw)| match std::str::from_utf8(raw) {
                Ok(line) => line.to_string(),
                Err(_) => {
                    warn!(
                        "Line {} of {} is not valid UTF-8",
                        index + 1,
                        self.path.display()
                    );
                    String::from_utf8_lossy(raw).into_owned()
                }
            })
            .collect())
    }

    /// Replaces the whole file with `lines`, each terminated by a newline.
    pub fn save(&self, lines: &[String]) -> Result<()> {
        let mut content = String::new();
        for line in lines {
            content.push_str(line);
            content.push('\n');
        }
        write_private(&self.path, &content)?;
        debug!("Saved {} songs to {}", lines.len(), self.path.display());
        Ok(())
    }

    /// Parsed records, skipping blank lines.
    pub fn records(&self) -> Result<Vec<SongRecord>> {
        Ok(self
            .load()?
            .iter()
            .filter(|line| !line.trim().is_empty())
            .map(|line| SongRecord::parse_line(line))
            .collect())
    }

    /// Appends a new song. Invalid names are an error; a name that is
    /// already listed leaves the file alone and returns `false`.
    pub fn add(&self, name: &str, tag: Tag) -> Result<bool> {
        validate_name(name)?;

        let mut lines = self.load()?;
        if lines.iter().any(|line| SongRecord::parse_line(line).name == name) {
            debug!("Song `{name}' is already in the list");
            return Ok(false);
        }

        let record = SongRecord::new(name, tag);
        lines.push(record.to_line());
        self.save(&lines)?;
        info!("Added song `{record}'");
        Ok(true)
    }

    /// Removes every line naming `name`. The whole raw line is accepted too.
    /// An empty name never matches, so blank lines are left alone.
    pub fn remove(&self, name: &str) -> Result<bool> {
        if name.trim().is_empty() {
            debug!("Empty song name, nothing removed");
            return Ok(false);
        }

        let lines = self.load()?;
        let before = lines.len();
        let kept: Vec<String> = lines
            .into_iter()
            .filter(|line| !matches_song(line, name))
            .collect();

        if kept.len() == before {
            debug!("Song `{name}' not found, nothing removed");
            return Ok(false);
        }

        self.save(&kept)?;
        info!("Removed song `{name}'");
        Ok(true)
    }

    /// Replaces the tag of every line naming `name`, appending one when the
    /// line has none. Returns `false` if no line matched.
    pub fn set_tag(&self, name: &str, tag: Tag) -> Result<bool> {
        let mut lines = self.load()?;
        let mut found = false;

        for line in lines.iter_mut().filter(|line| matches_song(line, name)) {
            let mut record = SongRecord::parse_line(line);
            record.tag = tag.clone();
            *line = record.to_line();
            found = true;
        }

        if !found {
            debug!("Song `{name}' not found, tag left unchanged");
            return Ok(false);
        }

        self.save(&lines)?;
        info!("Set tag of `{name}' to `{tag}'");
        Ok(true)
    }
}

fn matches_song(line: &str, name: &str) -> bool {
    line.strip_suffix('\r').unwrap_or(line) == name || SongRecord::parse_line(line).name == name
}

/// Writes `content` to `path` through a temp file in the same directory,
/// leaving the result readable and writable by the owner only.
///
/// If `path` is a symlink the write goes to its target and the link stays.
pub(crate) fn write_private(path: &Path, content: &str) -> Result<()> {
    let target = match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to resolve {}", path.display()))
        }
    };
    if target.as_path() != path {
        debug!("Writing {} through to {}", path.display(), target.display());
    }
    let path = target.as_path();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {}", path.display()))?;
    temp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush temporary file for {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(PRIVATE_MODE))
            .with_context(|| format!("Failed to set permissions for {}", path.display()))?;
    }

    temp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

#[cfg(unix)]
fn fix_permissions(path: &Path, created: bool) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .permissions()
        .mode();

    if created || mode & PRIVATE_MODE != PRIVATE_MODE {
        if !created {
            warn!("File has incorrect permissions. Setting to 600.");
        }
        fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_MODE))
            .with_context(|| format!("Failed to set file permissions on {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn fix_permissions(_path: &Path, _created: bool) -> Result<()> {
    Ok(())
}
