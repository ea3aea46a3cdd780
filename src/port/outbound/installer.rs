//! Host tooling ports: locating binaries and installing packages.

use std::path::PathBuf;

use crate::error::Result;

/// Finds executables on the host.
pub trait ToolProbe: Send + Sync {
    /// Return the resolved path of `binary`, or `None` if it is not installed.
    fn locate(&self, binary: &str) -> Option<PathBuf>;
}

/// Installs system packages.
pub trait PackageManager: Send + Sync {
    /// Return the package manager name for logging.
    fn name(&self) -> &'static str;

    /// Install all `packages` in one invocation.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the raw tool output if installation fails.
    fn install(&self, packages: &[String]) -> Result<()>;
}
