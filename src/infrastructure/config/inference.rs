//! Local inference service settings.

use std::path::PathBuf;

use serde::Deserialize;

/// Environment variable holding the inference API key.
pub const API_KEY_ENV: &str = "NODEFLEET_API_KEY";

/// Inference service launch and smoke-test configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Inference server binary.
    pub binary: PathBuf,
    /// Extra arguments for the binary.
    pub args: Vec<String>,
    /// Local port the service listens on.
    pub port: u16,
    /// Name of the variable the child reads its API key from.
    pub api_key_var: String,
    /// Name of the variable the child reads its port from.
    pub port_var: String,
    /// Seconds to wait for the port to accept connections after launch.
    pub startup_timeout_secs: u64,
    /// Remote chat-completions endpoint for the smoke test. Unset skips it.
    pub smoke_url: Option<String>,
    pub smoke_model: String,
    pub smoke_prompt: String,
    /// HTTP timeout for the smoke test.
    pub request_timeout_secs: u64,
    /// Loaded from `NODEFLEET_API_KEY` at runtime (never from the config file).
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("/usr/local/bin/inference-server"),
            args: Vec::new(),
            port: 11434,
            api_key_var: "API_KEY".into(),
            port_var: "PORT".into(),
            startup_timeout_secs: 30,
            smoke_url: None,
            smoke_model: "llama3.2:1b".into(),
            smoke_prompt: "Reply with the single word: ok".into(),
            request_timeout_secs: 30,
            api_key: None,
        }
    }
}
