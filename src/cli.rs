//! # Command-Line Interface Module
//!
//! Clap definitions for pif. Without a subcommand pif opens the interactive
//! menu, so the plain `pif` invocation behaves like the classic tool.
//!
//! ## Examples
//!
//! ```bash
//! pif add Clair_de_Lune --every 3
//! pif add Hanon_1 --rot
//! pif due --notify
//! pif practice Clair_de_Lune
//! ```

use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "pif")]
#[command(about = "pif: practice songs on schedule")]
#[command(version)]
pub struct Args {
    /// Song list file [default: ~/.pif]
    #[arg(long, global = true, env = "PIF_FILE", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Rotation state file [default: ~/.pif-config]
    #[arg(long, global = true, env = "PIF_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding practice markers [default: ~]
    #[arg(long, global = true, env = "PIF_MARKER_DIR", value_name = "DIR")]
    pub marker_dir: Option<PathBuf>,

    /// The subcommand to execute; opens the menu when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a song to the list
    ///
    /// Song names may not contain spaces; use `_` or `-` instead.
    #[command(group(ArgGroup::new("schedule").args(["rot", "every"])))]
    Add {
        /// Song name
        name: String,

        /// Put the song in the daily rotation
        #[arg(long)]
        rot: bool,

        /// Practice the song every DAYS days
        #[arg(long, value_name = "DAYS", value_parser = clap::value_parser!(u32).range(1..))]
        every: Option<u32>,
    },

    /// Remove a song from the list
    Remove {
        /// Song name (or the full line as shown by `show`)
        #[arg(value_hint = clap::ValueHint::Other)]
        name: String,
    },

    /// Set how many days may pass between practices of a song
    Freq {
        /// Song name
        #[arg(value_hint = clap::ValueHint::Other)]
        name: String,

        /// Days between practices
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,
    },

    /// Move a song into the daily rotation
    Rot {
        /// Song name
        #[arg(value_hint = clap::ValueHint::Other)]
        name: String,
    },

    /// Show all songs and their practice tags
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the songs due today and advance the rotation
    ///
    /// Rotation songs are handed out round-robin, `songs_per_day` at a time.
    /// Songs with a frequency are due once that many days have passed since
    /// `pif practice` was last run for them.
    Due {
        /// Do not advance the rotation
        #[arg(long)]
        dry_run: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Also send a desktop notification
        #[arg(long)]
        notify: bool,
    },

    /// Record that a song was practiced now
    Practice {
        /// Song name
        #[arg(value_hint = clap::ValueHint::Other)]
        name: String,
    },

    /// Show or change the rotation settings
    Config {
        /// Rotation songs per day
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        songs_per_day: Option<u64>,

        /// Position in the rotation where the next day starts
        #[arg(long)]
        last_played: Option<usize>,
    },

    /// Open the interactive menu
    Menu,

    /// Enable the daily notification service (runs the installer via pkexec)
    InstallService,

    /// Generate shell completions
    ///
    /// Usage: pif completion bash > ~/.local/share/bash-completion/completions/pif
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List song names for completion (hidden command)
    #[command(hide = true)]
    CompleteSongs,
}
