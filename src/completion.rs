//! # Shell Completion Module
//!
//! Completion scripts come from clap_complete. Song names for `remove`,
//! `freq`, `rot` and `practice` are listed by the hidden `complete-songs`
//! command.
//!
//! ```bash
//! pif completion bash > ~/.local/share/bash-completion/completions/pif
//! pif completion zsh > ~/.config/zsh/completions/_pif
//! ```

use crate::store::SongStore;
use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::{self, Write};

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
pub fn shell_to_completion_shell(shell: &crate::cli::Shell) -> CompletionShell {
    match shell {
        crate::cli::Shell::Bash => CompletionShell::Bash,
        crate::cli::Shell::Zsh => CompletionShell::Zsh,
        crate::cli::Shell::Fish => CompletionShell::Fish,
        crate::cli::Shell::PowerShell => CompletionShell::PowerShell,
        crate::cli::Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Sorted, de-duplicated song names. An unreadable song file yields no
/// completions rather than an error.
pub fn get_song_completions(store: &SongStore) -> Vec<String> {
    let mut names: Vec<String> = match store.records() {
        Ok(records) => records.into_iter().map(|record| record.name).collect(),
        Err(e) => {
            log::debug!("No song completions: {e:#}");
            return Vec::new();
        }
    };
    names.sort();
    names.dedup();
    names
}

/// Print one song name per line.
pub fn print_song_completions<W: Write>(store: &SongStore, out: &mut W) -> Result<()> {
    for name in get_song_completions(store) {
        writeln!(out, "{name}")?;
    }
    Ok(())
}
