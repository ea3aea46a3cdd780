//! System dependency requirements.

use serde::Deserialize;

use crate::application::installer::ToolRequirement;

/// Package manager and the tools it must provide.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub package_manager: String,
    pub requirements: Vec<ToolRequirement>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            package_manager: "apt-get".into(),
            requirements: vec![
                ToolRequirement::new("curl", "curl"),
                ToolRequirement::new("jq", "jq"),
                ToolRequirement::new("docker", "docker.io"),
            ],
        }
    }
}
