//! Inference service ports: launching the local binary and probing a
//! remote completion endpoint.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

/// Everything needed to start the inference binary.
#[derive(Clone)]
pub struct SpawnSpec {
    pub binary: PathBuf,
    pub args: Vec<String>,
    /// Extra environment for the child. Values may be secret.
    pub env: BTreeMap<String, String>,
    /// File receiving the child's stdout and stderr.
    pub log_file: PathBuf,
}

impl std::fmt::Debug for SpawnSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpawnSpec")
            .field("binary", &self.binary)
            .field("args", &self.args)
            .field("env", &self.env.keys().collect::<Vec<_>>())
            .field("log_file", &self.log_file)
            .finish()
    }
}

/// Starts and observes the local inference service.
pub trait ServiceSpawner: Send + Sync {
    /// Start the service detached from this process and return its PID.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary cannot be started.
    fn spawn(&self, spec: &SpawnSpec) -> Result<u32>;

    /// True if something accepts TCP connections on the local `port`.
    fn is_serving(&self, port: u16) -> bool;
}

/// Outcome of a smoke-test request. Non-success is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single completion request to a remote endpoint.
#[async_trait]
pub trait CompletionProbe: Send + Sync {
    /// Send `prompt` for `model`, authenticated with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error only if no HTTP response was received at all.
    async fn complete(&self, api_key: &str, model: &str, prompt: &str) -> Result<ProbeResponse>;
}
