use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nodefleet::error::{Error, Result};
use nodefleet::port::outbound::runtime::{ContainerRuntime, LogOptions};

/// One recorded runtime invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    NetworkExists(String),
    CreateNetwork { network: String, subnet: String },
    Up(PathBuf),
    Down(PathBuf),
    Logs(PathBuf, LogOptions),
}

/// Container runtime that records calls instead of running anything.
#[derive(Default)]
pub struct RecordingRuntime {
    calls: Mutex<Vec<Call>>,
    networks: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<PathBuf>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network(network: &str) -> Self {
        let runtime = Self::default();
        runtime.networks.lock().unwrap().insert(network.to_string());
        runtime
    }

    /// Make every operation on `definition` fail.
    pub fn fail_on(&self, definition: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(definition.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, definition: &Path, verb: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(definition) {
            return Err(Error::external(
                format!("compose {verb}"),
                "simulated failure",
            ));
        }
        Ok(())
    }
}

impl ContainerRuntime for RecordingRuntime {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn network_exists(&self, network: &str) -> Result<bool> {
        self.record(Call::NetworkExists(network.to_string()));
        Ok(self.networks.lock().unwrap().contains(network))
    }

    fn create_network(&self, network: &str, subnet: &str) -> Result<()> {
        self.record(Call::CreateNetwork {
            network: network.to_string(),
            subnet: subnet.to_string(),
        });
        self.networks.lock().unwrap().insert(network.to_string());
        Ok(())
    }

    fn up(&self, definition: &Path) -> Result<()> {
        self.record(Call::Up(definition.to_path_buf()));
        self.check(definition, "up")
    }

    fn down(&self, definition: &Path) -> Result<()> {
        self.record(Call::Down(definition.to_path_buf()));
        self.check(definition, "down")
    }

    fn logs(&self, definition: &Path, options: LogOptions) -> Result<()> {
        self.record(Call::Logs(definition.to_path_buf(), options));
        self.check(definition, "logs")
    }
}
