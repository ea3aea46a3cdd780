//! Handlers for `check deps` and `check inference`.

use std::path::Path;

use super::{inference, load_config, output};
use crate::adapter::outbound::{PathProbe, ProcessSpawner};
use crate::application::inference::InferenceLauncher;
use crate::application::installer::DependencyInstaller;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::outbound::inference::{CompletionProbe, ServiceSpawner};

/// Execute `check deps`.
pub fn execute_deps(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let probe = PathProbe;
    let packages = bootstrap::package_manager(&config);
    let installer = DependencyInstaller::new(&probe, &packages);

    output::section("Dependencies");
    let statuses = installer.check(&config.installer.requirements);
    let mut missing = 0;
    for status in &statuses {
        match &status.location {
            Some(path) => output::success(&format!(
                "{} {}",
                status.requirement.binary,
                output::muted(path.display())
            )),
            None => {
                missing += 1;
                output::warning(&format!(
                    "{} missing (package {})",
                    status.requirement.binary, status.requirement.package
                ));
            }
        }
    }

    let runtime = bootstrap::container_runtime(&config)?;
    match runtime.compose_version() {
        Ok(version) => output::success(&format!("compose {}", output::muted(version))),
        Err(e) => {
            missing += 1;
            output::warning(&format!("compose unavailable: {e}"));
        }
    }

    if missing > 0 {
        output::hint("run `sudo nodefleet provision ...` to install missing packages");
    }
    Ok(())
}

/// Execute `check inference`.
pub async fn execute_inference(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let spawner = ProcessSpawner;

    output::section("Inference");
    let port = config.inference.port;
    if spawner.is_serving(port) {
        output::success(&format!("port {port} is accepting connections"));
    } else {
        output::warning(&format!("nothing listening on port {port}"));
    }

    let Some(api_key) = config.inference.api_key.as_deref() else {
        output::warning("NODEFLEET_API_KEY is not set; smoke test skipped");
        return Ok(());
    };
    let completion = bootstrap::completion_probe(&config)?;
    let launcher = InferenceLauncher::new(
        &spawner,
        completion.as_ref().map(|p| p as &dyn CompletionProbe),
    );
    let smoke = launcher
        .smoke_test(
            api_key,
            &config.inference.smoke_model,
            &config.inference.smoke_prompt,
        )
        .await;
    inference::print_smoke(&smoke);
    Ok(())
}
