//! Fleet layout and node container parameters.

use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::compose::{RestartPolicy, ServiceTemplate};

/// Parameters shared by every generated group.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Directory holding group directories, the manifest and wallets.
    /// Unset means `~/.nodefleet/fleet`.
    pub root: Option<PathBuf>,
    /// Node container image.
    pub image: String,
    /// External network every service attaches to.
    pub network: String,
    /// Fixed address range of the external network.
    pub subnet: String,
    /// Models each node serves.
    pub models: Vec<String>,
    /// Address the node listens on inside its container.
    pub listen_address: String,
    /// Host the node reaches the inference service on.
    pub upstream_host: String,
    /// Port of the inference service.
    pub upstream_port: u16,
    /// Let nodes pull missing models on their own.
    pub auto_pull: bool,
    /// Container restart behaviour.
    pub restart: RestartPolicy,
    /// Default node count per wallet when the CLI does not override it.
    pub nodes_per_wallet: u32,
}

impl FleetConfig {
    /// Build the service template used by the generator.
    #[must_use]
    pub fn template(&self) -> ServiceTemplate {
        ServiceTemplate {
            image: self.image.clone(),
            network: self.network.clone(),
            models: self.models.clone(),
            listen_address: self.listen_address.clone(),
            upstream_host: self.upstream_host.clone(),
            upstream_port: self.upstream_port,
            auto_pull: self.auto_pull,
            restart: self.restart,
        }
    }
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            root: None,
            image: "compute-node:latest".into(),
            network: "nodefleet_net".into(),
            subnet: "172.28.0.0/16".into(),
            models: vec!["llama3.2:1b".into()],
            listen_address: "0.0.0.0:8080".into(),
            upstream_host: "172.28.0.1".into(),
            upstream_port: 11434,
            auto_pull: true,
            restart: RestartPolicy::OnFailure,
            nodes_per_wallet: 1,
        }
    }
}

/// How the container runtime is invoked.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime CLI used for network management.
    pub binary: String,
    /// Command prefix for compose operations.
    pub compose_command: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: "docker".into(),
            compose_command: vec!["docker".into(), "compose".into()],
        }
    }
}
