//! Song records as they live in the song file.
//!
//! One song per line: `name` or `name tag`. The tag is whatever follows the
//! last space, so names must not contain whitespace.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal tag marking a song as part of the rotation pool.
pub const ROTATION_TAG: &str = "rot";

/// Practice tag attached to a song.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// No tag at all.
    #[default]
    None,
    /// Round-robin rotation song (`rot`).
    Rotation,
    /// Due every `n` days.
    Frequency(u32),
    /// Anything else. Kept verbatim so a save reproduces the line, never due.
    Other(String),
}

impl Tag {
    /// Classifies a raw tag string. Never fails: malformed input becomes `Other`.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Tag::None;
        }
        if raw == ROTATION_TAG {
            return Tag::Rotation;
        }
        match raw.parse::<u32>() {
            Ok(days) if days > 0 => Tag::Frequency(days),
            _ => Tag::Other(raw.to_string()),
        }
    }

    /// Parses a day interval entered by the user. Unlike [`Tag::parse`] this
    /// rejects anything that is not a positive integer.
    pub fn frequency_from_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        match trimmed.parse::<i64>() {
            Ok(days) if days > 0 => u32::try_from(days)
                .map(Tag::Frequency)
                .map_err(|_| anyhow!("Frequency `{trimmed}' is too large")),
            _ => Err(anyhow!("Please enter a positive number of days (got `{trimmed}')")),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::None => Ok(()),
            Tag::Rotation => f.write_str(ROTATION_TAG),
            Tag::Frequency(days) => write!(f, "{days}"),
            Tag::Other(raw) => f.write_str(raw),
        }
    }
}

/// A single line of the song file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub name: String,
    pub tag: Tag,
}

impl SongRecord {
    pub fn new(name: impl Into<String>, tag: Tag) -> Self {
        Self { name: name.into(), tag }
    }

    /// Splits a line at its last space. No space means no tag. A trailing
    /// carriage return from a CRLF file is not part of the tag.
    pub fn parse_line(line: &str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match line.rsplit_once(' ') {
            Some((name, raw_tag)) => Self {
                name: name.to_string(),
                tag: Tag::parse(raw_tag),
            },
            None => Self {
                name: line.to_string(),
                tag: Tag::None,
            },
        }
    }

    /// Renders the record back into its file form.
    pub fn to_line(&self) -> String {
        match self.tag {
            Tag::None => self.name.clone(),
            _ => format!("{} {}", self.name, self.tag),
        }
    }

    pub fn is_rotation(&self) -> bool {
        self.tag == Tag::Rotation
    }

    /// Day interval, if this is a frequency song.
    pub fn frequency(&self) -> Option<u32> {
        match self.tag {
            Tag::Frequency(days) => Some(days),
            _ => None,
        }
    }
}

impl fmt::Display for SongRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Checks the naming rule: non-empty and no whitespace anywhere.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("Song name must not be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(anyhow!("Song name `{name}' must not contain spaces"));
    }
    Ok(())
}
