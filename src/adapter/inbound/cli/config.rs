//! `config init|show|validate`.

use std::path::Path;

use super::{load_config, output};
use crate::application::fs::write_atomic;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::inference::API_KEY_ENV;

/// Documented template written by `config init`.
const TEMPLATE: &str = include_str!("../../../../config.toml.example");

/// Write the documented template to `path`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: format!("{} already exists (use --force to replace it)", path.display()),
        }
        .into());
    }
    write_atomic(path, TEMPLATE.as_bytes(), None)?;

    output::section("Config Written");
    output::field("Path", path.display());
    output::note(&format!("edit the [fleet] and [inference] sections, then export {API_KEY_ENV}"));
    output::hint(&format!("nodefleet config validate -c {}", path.display()));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = load_config(path)?;

    output::section("Configuration");
    output::field(
        "Source",
        if path.exists() {
            path.display().to_string()
        } else {
            "(built-in defaults)".to_string()
        },
    );

    let fleet = &config.fleet;
    output::section("Fleet");
    output::field(
        "Root",
        fleet
            .root
            .as_ref()
            .map_or_else(|| "(default)".to_string(), |r| r.display().to_string()),
    );
    output::field("Image", &fleet.image);
    output::field("Network", format!("{} ({})", fleet.network, fleet.subnet));
    output::field("Models", fleet.models.join(", "));
    output::field("Upstream", format!("{}:{}", fleet.upstream_host, fleet.upstream_port));
    output::field("Restart", fleet.restart);
    output::field("Nodes", fleet.nodes_per_wallet);

    output::section("Runtime");
    output::field("Binary", &config.runtime.binary);
    output::field("Compose", config.runtime.compose_command.join(" "));

    let inference = &config.inference;
    output::section("Inference");
    output::field("Binary", inference.binary.display());
    output::field("Port", inference.port);
    output::field(
        "Smoke test",
        inference.smoke_url.as_deref().unwrap_or("(disabled)"),
    );
    if inference.api_key.is_some() {
        output::success(&format!("API key loaded from {API_KEY_ENV}"));
    } else {
        output::warning(&format!("{API_KEY_ENV} not set"));
    }

    output::section("Installer");
    output::field("Manager", &config.installer.package_manager);
    output::field(
        "Requires",
        config
            .installer
            .requirements
            .iter()
            .map(|r| r.binary.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    );
    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    load_config(path)?;
    output::section("Config");
    output::field("Path", path.display());
    output::success("valid");
    output::hint(&format!("nodefleet config show -c {}", path.display()));
    Ok(())
}
