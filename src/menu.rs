//! Interactive terminal menu.
//!
//! Runs when `pif` is started without a subcommand. Reads numbered choices
//! (or the option text itself) from the input until `6` / `Exit` or end of
//! input.

use crate::service::ServiceInstaller;
use crate::song::{validate_name, Tag};
use crate::store::SongStore;
use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::io::{BufRead, Write};

pub const RULER: &str = "----------------------------------------";

const MENU_TEXT: &str = "Choose an option:\n\
                         1. Add song\n\
                         2. Remove song\n\
                         3. Modify frequency\n\
                         4. Add systemd service\n\
                         5. Show songs\n\
                         6. Exit\n";

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddSong,
    RemoveSong,
    ModifyFrequency,
    InstallService,
    ShowSongs,
    Exit,
}

impl MenuChoice {
    /// Accepts `1`-`6` or the exact option text.
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "1" | "Add song" => Some(Self::AddSong),
            "2" | "Remove song" => Some(Self::RemoveSong),
            "3" | "Modify frequency" => Some(Self::ModifyFrequency),
            "4" | "Add systemd service" => Some(Self::InstallService),
            "5" | "Show songs" => Some(Self::ShowSongs),
            "6" | "Exit" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Menu loop over arbitrary input and output streams.
pub struct Menu<'a, R, W> {
    input: R,
    output: W,
    store: &'a SongStore,
    installer: &'a dyn ServiceInstaller,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(
        input: R,
        output: W,
        store: &'a SongStore,
        installer: &'a dyn ServiceInstaller,
    ) -> Self {
        Self {
            input,
            output,
            store,
            installer,
        }
    }

    /// Runs until the user exits. I/O failures on the song file abort the
    /// loop; bad user input only prints a message.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.output.write_all(MENU_TEXT.as_bytes())?;
            self.output.flush()?;

            let Some(option) = self.read_line()? else {
                debug!("End of input, leaving menu");
                return Ok(());
            };

            match MenuChoice::parse(&option) {
                Some(MenuChoice::AddSong) => self.add_song()?,
                Some(MenuChoice::RemoveSong) => self.remove_song()?,
                Some(MenuChoice::ModifyFrequency) => self.modify_frequency()?,
                Some(MenuChoice::InstallService) => self.install_service()?,
                Some(MenuChoice::ShowSongs) => write_song_listing(&mut self.output, self.store)?,
                Some(MenuChoice::Exit) => return Ok(()),
                None => {
                    writeln!(
                        self.output,
                        "{}",
                        "\nInvalid option. Please try again.\n".red()
                    )?;
                }
            }
        }
    }

    fn add_song(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter the song name: ")? else {
            return Ok(());
        };

        if let Err(e) = validate_name(&name) {
            writeln!(self.output, "{e}")?;
            return Ok(());
        }

        if self.store.add(&name, Tag::None)? {
            writeln!(self.output, "Song '{name}' added successfully.")?;
        } else {
            writeln!(self.output, "Song '{name}' is already in the file.")?;
        }
        Ok(())
    }

    fn remove_song(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter the song name: ")? else {
            return Ok(());
        };

        if name.trim().is_empty() {
            writeln!(self.output, "Song name must not be empty")?;
            return Ok(());
        }

        if self.store.remove(&name)? {
            writeln!(self.output, "Song '{name}' removed successfully.")?;
        } else {
            writeln!(self.output, "Song '{name}' not found in the file.")?;
        }
        Ok(())
    }

    fn modify_frequency(&mut self) -> Result<()> {
        let Some(name) = self.prompt("Enter the song name: ")? else {
            return Ok(());
        };
        let Some(raw) = self.prompt("Enter the frequency (as an integer): ")? else {
            return Ok(());
        };

        let tag = match Tag::frequency_from_input(&raw) {
            Ok(tag) => tag,
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(());
            }
        };

        if self.store.set_tag(&name, tag)? {
            writeln!(self.output, "Frequency for '{name}' modified successfully.")?;
        } else {
            writeln!(self.output, "Song '{name}' not found in the file.")?;
        }
        Ok(())
    }

    fn install_service(&mut self) -> Result<()> {
        match self.installer.install() {
            Ok(()) => writeln!(self.output, "Notification service enabled successfully!")?,
            Err(e) => writeln!(self.output, "{}", format!("Error: {e:#}").red())?,
        }
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        self.read_line()
    }

    /// Next line without its line ending, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from standard input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Prints the raw song file between rulers.
pub fn write_song_listing<W: Write>(out: &mut W, store: &SongStore) -> Result<()> {
    writeln!(out, "\nCurrent songs and practice frequencies:")?;
    writeln!(out, "{RULER}")?;
    for line in store.load()? {
        writeln!(out, "{line}")?;
    }
    writeln!(out, "{RULER}\n")?;
    Ok(())
}
