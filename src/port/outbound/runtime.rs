//! Container runtime port.
//!
//! The runtime and its compose semantics are opaque: the fleet only asks it
//! to manage one external network and to run lifecycle operations against a
//! single group definition file at a time.

use std::path::Path;

use crate::error::Result;

/// Options for streaming a group's logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    /// Number of trailing lines to show per service.
    pub tail: u32,
    /// Keep streaming until interrupted.
    pub follow: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            tail: 100,
            follow: false,
        }
    }
}

/// Lifecycle operations on container groups.
///
/// Every call is blocking. Implementations must not change the process
/// working directory; the definition path is always passed explicitly.
pub trait ContainerRuntime: Send + Sync {
    /// Return the runtime name for logging.
    fn name(&self) -> &'static str;

    /// Check whether a network exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be queried.
    fn network_exists(&self, network: &str) -> Result<bool>;

    /// Create a network with a fixed address range.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime rejects the request.
    fn create_network(&self, network: &str, subnet: &str) -> Result<()>;

    /// Bring up every service in the definition, building images as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime invocation fails.
    fn up(&self, definition: &Path) -> Result<()>;

    /// Tear down every service in the definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime invocation fails.
    fn down(&self, definition: &Path) -> Result<()>;

    /// Stream combined logs for the definition's services to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime invocation fails.
    fn logs(&self, definition: &Path, options: LogOptions) -> Result<()>;

    /// Create the network unless it already exists.
    ///
    /// Returns `true` if the network was created by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or creation fails.
    fn ensure_network(&self, network: &str, subnet: &str) -> Result<bool> {
        if self.network_exists(network)? {
            return Ok(false);
        }
        self.create_network(network, subnet)?;
        Ok(true)
    }
}
