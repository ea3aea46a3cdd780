//! Typed container-group definition.
//!
//! A [`ComposeFile`] is built from a [`NodeGroup`] and a [`ServiceTemplate`]
//! and serialized by `serde_yaml`; nothing is string-templated, so private
//! keys are always emitted as properly quoted scalars.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::group::NodeGroup;

/// Environment key carrying the wallet's private key.
pub const ENV_PRIVATE_KEY: &str = "PRIVATE_KEY";
/// Environment key carrying the comma-separated model list.
pub const ENV_MODELS: &str = "MODELS";
/// Environment key carrying the node's listen address.
pub const ENV_LISTEN_ADDRESS: &str = "LISTEN_ADDRESS";
/// Environment key carrying the upstream inference host.
pub const ENV_UPSTREAM_HOST: &str = "UPSTREAM_HOST";
/// Environment key carrying the upstream inference port.
pub const ENV_UPSTREAM_PORT: &str = "UPSTREAM_PORT";
/// Environment key toggling automatic model pulls.
pub const ENV_AUTO_PULL: &str = "AUTO_PULL";

/// Container restart behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Never restart.
    No,
    /// Restart only when the container exits non-zero.
    #[default]
    OnFailure,
    /// Restart unless explicitly stopped.
    UnlessStopped,
    /// Always restart.
    Always,
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::No => "no",
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
            Self::Always => "always",
        };
        f.write_str(label)
    }
}

/// Fixed parameters shared by every service in the fleet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTemplate {
    pub image: String,
    pub network: String,
    pub models: Vec<String>,
    pub listen_address: String,
    pub upstream_host: String,
    pub upstream_port: u16,
    pub auto_pull: bool,
    pub restart: RestartPolicy,
}

/// One runnable container definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    pub image: String,
    pub environment: BTreeMap<String, String>,
    pub networks: Vec<String>,
    pub restart: RestartPolicy,
}

impl ServiceDefinition {
    /// The private key bound into this service, if any.
    #[must_use]
    pub fn private_key(&self) -> Option<&str> {
        self.environment.get(ENV_PRIVATE_KEY).map(String::as_str)
    }
}

/// Top-level network entry. Groups never own the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDeclaration {
    pub external: bool,
}

/// A whole container-group definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeFile {
    /// Compose project name; equal to the group directory name.
    pub name: String,
    pub services: BTreeMap<String, ServiceDefinition>,
    pub networks: BTreeMap<String, NetworkDeclaration>,
}

impl ComposeFile {
    /// Build the definition for one group.
    #[must_use]
    pub fn for_group(group: &NodeGroup<'_>, template: &ServiceTemplate) -> Self {
        let environment = service_environment(group, template);

        let services = group
            .service_names()
            .map(|name| {
                let service = ServiceDefinition {
                    image: template.image.clone(),
                    environment: environment.clone(),
                    networks: vec![template.network.clone()],
                    restart: template.restart,
                };
                (name, service)
            })
            .collect();

        let mut networks = BTreeMap::new();
        networks.insert(
            template.network.clone(),
            NetworkDeclaration { external: true },
        );

        Self {
            name: group.directory_name().to_string(),
            services,
            networks,
        }
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Parse a rendered definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid definition.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Number of service entries.
    #[must_use]
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

fn service_environment(
    group: &NodeGroup<'_>,
    template: &ServiceTemplate,
) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();
    env.insert(
        ENV_PRIVATE_KEY.to_string(),
        group.wallet().private_key().to_string(),
    );
    env.insert(ENV_MODELS.to_string(), template.models.join(","));
    env.insert(
        ENV_LISTEN_ADDRESS.to_string(),
        template.listen_address.clone(),
    );
    env.insert(
        ENV_UPSTREAM_HOST.to_string(),
        template.upstream_host.clone(),
    );
    env.insert(
        ENV_UPSTREAM_PORT.to_string(),
        template.upstream_port.to_string(),
    );
    env.insert(ENV_AUTO_PULL.to_string(), template.auto_pull.to_string());
    env
}
