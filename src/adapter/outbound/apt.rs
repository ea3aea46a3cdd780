//! Host tooling adapters: `PATH` lookup and `apt-get`.

use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::installer::{PackageManager, ToolProbe};

/// Resolves binaries against the current `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl ToolProbe for PathProbe {
    fn locate(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }
}

/// Debian-family package manager.
#[derive(Debug, Clone)]
pub struct AptPackageManager {
    binary: String,
}

impl AptPackageManager {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.env("DEBIAN_FRONTEND", "noninteractive");
        cmd
    }

    fn update_command(&self) -> Command {
        let mut cmd = self.command();
        cmd.arg("update");
        cmd
    }

    fn install_command(&self, packages: &[String]) -> Command {
        let mut cmd = self.command();
        cmd.args(["install", "-y"]).args(packages);
        cmd
    }
}

impl Default for AptPackageManager {
    fn default() -> Self {
        Self::new("apt-get")
    }
}

impl PackageManager for AptPackageManager {
    fn name(&self) -> &'static str {
        "apt-get"
    }

    fn install(&self, packages: &[String]) -> Result<()> {
        if packages.is_empty() {
            return Ok(());
        }
        if !is_root() {
            return Err(ConfigError::Other(format!(
                "installing {} requires root (re-run with sudo or pass --skip-install)",
                packages.join(", ")
            ))
            .into());
        }

        info!("refreshing package index");
        run(self.update_command(), "apt-get update")?;
        info!(packages = %packages.join(" "), "installing packages");
        run(self.install_command(packages), "apt-get install")
    }
}

fn run(mut cmd: Command, what: &str) -> Result<()> {
    debug!(command = ?cmd, "running");
    let output = cmd
        .output()
        .map_err(|e| Error::external(what, format!("could not execute: {e}")))?;
    if output.status.success() {
        return Ok(());
    }
    let mut detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if detail.is_empty() {
        detail = String::from_utf8_lossy(&output.stdout).trim().to_string();
    }
    Err(Error::external(what, format!("{detail} ({})", output.status)))
}

/// True if the effective user is root.
#[must_use]
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn install_is_noninteractive_and_batched() {
        let apt = AptPackageManager::default();
        let cmd = apt.install_command(&["curl".into(), "docker.io".into()]);

        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["install", "-y", "curl", "docker.io"]);
        assert!(cmd
            .get_envs()
            .any(|(k, v)| k == "DEBIAN_FRONTEND" && v == Some("noninteractive".as_ref())));
    }

    #[test]
    fn empty_install_is_a_noop() {
        assert!(AptPackageManager::new("/nonexistent/apt-get").install(&[]).is_ok());
    }

    #[test]
    fn probe_misses_unknown_binary() {
        assert!(PathProbe.locate("nodefleet-no-such-tool-xyz").is_none());
    }
}
