//! Composition root: build outbound adapters from configuration.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::adapter::outbound::{AptPackageManager, DockerCompose, HttpCompletionProbe};
use crate::application::inference::LaunchPlan;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Log file for the inference service, relative to the fleet root.
pub const INFERENCE_LOG: &str = "inference.log";
/// PID file for the inference service, relative to the fleet root.
pub const INFERENCE_PID: &str = "inference.pid";

/// Build the container runtime adapter.
///
/// # Errors
///
/// Returns an error if the compose command is empty.
pub fn container_runtime(config: &Config) -> Result<DockerCompose> {
    DockerCompose::new(
        config.runtime.binary.clone(),
        config.runtime.compose_command.clone(),
    )
}

#[must_use]
pub fn package_manager(config: &Config) -> AptPackageManager {
    AptPackageManager::new(config.installer.package_manager.clone())
}

/// Build the smoke-test client, or `None` when no endpoint is configured.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn completion_probe(config: &Config) -> Result<Option<HttpCompletionProbe>> {
    let Some(url) = &config.inference.smoke_url else {
        debug!("no smoke_url configured, smoke test disabled");
        return Ok(None);
    };
    let timeout = Duration::from_secs(config.inference.request_timeout_secs);
    HttpCompletionProbe::new(url.clone(), timeout).map(Some)
}

/// Describe how to start the inference service under `root`.
#[must_use]
pub fn launch_plan(config: &Config, root: &Path) -> LaunchPlan {
    let inference = &config.inference;
    LaunchPlan {
        binary: inference.binary.clone(),
        args: inference.args.clone(),
        port: inference.port,
        api_key_var: inference.api_key_var.clone(),
        port_var: inference.port_var.clone(),
        startup_timeout: Duration::from_secs(inference.startup_timeout_secs),
        log_file: root.join(INFERENCE_LOG),
        pid_file: root.join(INFERENCE_PID),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_plan_places_files_under_root() {
        let plan = launch_plan(&Config::default(), Path::new("/srv/fleet"));
        assert_eq!(plan.log_file, Path::new("/srv/fleet/inference.log"));
        assert_eq!(plan.pid_file, Path::new("/srv/fleet/inference.pid"));
        assert_eq!(plan.port, 11434);
        assert_eq!(plan.startup_timeout, Duration::from_secs(30));
    }

    #[test]
    fn probe_is_disabled_without_url() {
        assert!(completion_probe(&Config::default()).unwrap().is_none());

        let mut config = Config::default();
        config.inference.smoke_url = Some("https://api.example.com/v1/chat/completions".into());
        assert!(completion_probe(&config).unwrap().is_some());
    }
}
