//! Practice-song tracker: which songs to practice today.
//!
//! Core modules:
//! - [`scheduler`] - Due-song selection (rotation and frequency)
//! - [`store`] - The song list file
//! - [`rotation`] - Rotation state and its config file
//! - [`marker`] - Per-song "last practiced" markers
//!
//! ### Supporting Modules
//!
//! - [`song`] - Song records and tags
//! - [`config`] - File locations
//! - [`cli`] - Command-line interface definitions with clap integration
//! - [`menu`] - Interactive terminal menu
//! - [`notify`] - The daily notifier
//! - [`service`] - Notification service installer
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use pif::{config, marker, rotation, scheduler, store};
//! use std::time::SystemTime;
//!
//! let paths = config::RuntimeConfig::new()?;
//! let songs = store::SongStore::new(&paths.song_file).records()?;
//! let rotation = rotation::RotationStore::new(&paths.rotation_file);
//! let markers = marker::PracticeMarkers::new(&paths.marker_dir);
//!
//! let plan = scheduler::plan_day(&songs, rotation.load()?, SystemTime::now(), &markers);
//! for name in plan.song_names() {
//!     println!("{name}");
//! }
//! rotation.save(&plan.next_state)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Song File
//!
//! `~/.pif` holds one song per line. The word after the last space is the
//! song's tag:
//!
//! - `rot` - the song is in the rotation pool
//! - a positive number `D` - practice every `D` days
//! - anything else, or nothing - never due
//!
//! ## Error Handling
//!
//! Public functions return `anyhow::Result`. Failing to read or write the
//! song or config files is fatal for the command. Malformed tags and a
//! missing config file are not errors.

pub mod cli;
pub mod completion;
pub mod config;
pub mod marker;
pub mod menu;
pub mod notify;
pub mod rotation;
pub mod scheduler;
pub mod service;
pub mod song;
pub mod store;
