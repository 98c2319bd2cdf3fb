//! Installs the daily notification service.
//!
//! The actual systemd unit is set up by `install-pif-notify.sh`, shipped next
//! to the binary by `make install`. pif only checks the script is usable and
//! runs it with elevated privileges through `pkexec`.

use anyhow::{bail, Context, Result};
use log::info;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Something that can enable the notification service.
pub trait ServiceInstaller {
    fn install(&self) -> Result<()>;
}

/// Runs the install script under `pkexec`.
#[derive(Debug, Clone)]
pub struct PkexecInstaller {
    script: PathBuf,
}

impl PkexecInstaller {
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
        }
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Fails with a user-facing message when the script is missing or not
    /// executable.
    pub fn check_script(&self) -> Result<()> {
        let meta = match self.script.metadata() {
            Ok(meta) => meta,
            Err(_) => bail!(
                "Installation script not found at {}. Please run 'make install' first.",
                self.script.display()
            ),
        };

        if !is_executable(&meta) {
            bail!(
                "Installation script is not executable. Please run:\nchmod +x {}",
                self.script.display()
            );
        }
        Ok(())
    }
}

impl ServiceInstaller for PkexecInstaller {
    fn install(&self) -> Result<()> {
        self.check_script()?;

        info!("Running pkexec {}", self.script.display());
        let status = Command::new("pkexec")
            .arg(&self.script)
            .status()
            .context("Failed to execute 'pkexec'")?;

        if !status.success() {
            bail!("Failed to enable notification service ({status}). Please check system logs.");
        }
        Ok(())
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.is_file() && meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    meta.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_script() {
        let dir = TempDir::new().unwrap();
        let installer = PkexecInstaller::new(dir.path().join("install-pif-notify.sh"));

        let err = installer.check_script().unwrap_err();
        assert!(err.to_string().contains("make install"));
        assert!(installer.install().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_script() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("install-pif-notify.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

        let err = PkexecInstaller::new(&script).check_script().unwrap_err();
        assert!(err.to_string().contains("chmod +x"));

        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(PkexecInstaller::new(&script).check_script().is_ok());
    }
}
