//! # pif - practice songs on schedule
//!
//! Keeps a list of songs to practice in `~/.pif` and tells you which ones are
//! due today.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive menu
//! pif
//!
//! # Manage the list
//! pif add Hanon_1 --rot
//! pif add Clair_de_Lune --every 3
//! pif show
//!
//! # What to practice today (advances the rotation)
//! pif due
//! pif practice Clair_de_Lune
//! ```

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use pif::cli::{self, Command};
use pif::completion;
use pif::config::RuntimeConfig;
use pif::marker::PracticeMarkers;
use pif::menu::{self, Menu};
use pif::notify::{self, DesktopNotifier, DueOptions};
use pif::rotation::RotationStore;
use pif::service::{PkexecInstaller, ServiceInstaller};
use pif::song::Tag;
use pif::store::SongStore;
use std::io::{self, Write};
use std::time::SystemTime;

/// Main entry point for pif.
///
/// Logging goes through `env_logger` and is controlled via `RUST_LOG`, e.g.
/// `RUST_LOG=debug pif due --dry-run`.
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let command = args.command.clone().unwrap_or(Command::Menu);

    if let Command::Completion { shell } = &command {
        let mut cmd = cli::Args::command();
        completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        return Ok(());
    }

    let config = RuntimeConfig::with_overrides(
        args.file.as_deref(),
        args.config.as_deref(),
        args.marker_dir.as_deref(),
    )?;
    let songs = SongStore::new(&config.song_file);

    if let Command::CompleteSongs = command {
        return completion::print_song_completions(&songs, &mut io::stdout().lock());
    }

    if songs.ensure_exists()? {
        eprintln!("File does not exist. Creating file.");
    }

    let rotation = RotationStore::new(&config.rotation_file);
    let markers = PracticeMarkers::new(&config.marker_dir);
    let installer = PkexecInstaller::new(&config.install_script);
    let mut stdout = io::stdout().lock();

    match command {
        Command::Add { name, rot, every } => {
            let tag = match (rot, every) {
                (true, _) => Tag::Rotation,
                (false, Some(days)) => Tag::Frequency(days),
                (false, None) => Tag::None,
            };
            if !songs.add(&name, tag)? {
                bail!("Song '{name}' is already in the list");
            }
            writeln!(stdout, "Song '{name}' added successfully.")?;
        }
        Command::Remove { name } => {
            if !songs.remove(&name)? {
                bail!("Song '{name}' not found in the file.");
            }
            writeln!(stdout, "Song '{name}' removed successfully.")?;
        }
        Command::Freq { name, days } => {
            if !songs.set_tag(&name, Tag::Frequency(days))? {
                bail!("Song '{name}' not found in the file.");
            }
            writeln!(stdout, "Frequency for '{name}' modified successfully.")?;
        }
        Command::Rot { name } => {
            if !songs.set_tag(&name, Tag::Rotation)? {
                bail!("Song '{name}' not found in the file.");
            }
            writeln!(stdout, "Song '{name}' added to the rotation.")?;
        }
        Command::Show { json } => {
            if json {
                serde_json::to_writer_pretty(&mut stdout, &songs.records()?)?;
                writeln!(stdout)?;
            } else {
                menu::write_song_listing(&mut stdout, &songs)?;
            }
        }
        Command::Due {
            dry_run,
            json,
            notify,
        } => {
            let options = DueOptions {
                dry_run,
                json,
                notify,
            };
            notify::run_due(
                &songs,
                &rotation,
                &markers,
                SystemTime::now(),
                options,
                &DesktopNotifier,
                &mut stdout,
            )?;
        }
        Command::Practice { name } => {
            if !songs.records()?.iter().any(|record| record.name == name) {
                bail!("Song '{name}' not found in the file.");
            }
            markers.touch(&name)?;
            writeln!(stdout, "Marked '{name}' as practiced.")?;
        }
        Command::Config {
            songs_per_day,
            last_played,
        } => {
            let mut state = rotation.load()?;
            if let Some(n) = songs_per_day {
                state.songs_per_day = usize::try_from(n)?;
            }
            if let Some(n) = last_played {
                state.last_played = n;
            }
            if songs_per_day.is_some() || last_played.is_some() {
                rotation.save(&state)?;
                info!("Rotation settings updated");
            }
            write!(stdout, "{}", state.render())?;
        }
        Command::Menu => {
            debug!("Starting interactive menu");
            drop(stdout);
            let stdin = io::stdin();
            Menu::new(stdin.lock(), io::stdout(), &songs, &installer).run()?;
        }
        Command::InstallService => {
            installer.install()?;
            writeln!(stdout, "Notification service enabled successfully!")?;
        }
        // Answered before the song file is touched.
        Command::Completion { .. } | Command::CompleteSongs => {}
    }

    Ok(())
}
