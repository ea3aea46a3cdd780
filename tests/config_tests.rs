use std::fs;
use std::sync::Mutex;

use nodefleet::application::installer::ToolRequirement;
use nodefleet::error::{ConfigError, Error};
use nodefleet::infrastructure::config::settings::Config;

static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn template_loads_with_defaults() {
    let config = Config::parse_toml(include_str!("../config.toml.example")).unwrap();
    assert_eq!(config.fleet.network, "nodefleet_net");
    assert_eq!(config.inference.api_key_var, "API_KEY");
    assert_eq!(config.installer.requirements.len(), 3);
}

#[test]
fn api_key_comes_from_environment_only() {
    let _guard = ENV_LOCK.lock().expect("env lock poisoned");

    std::env::set_var("NODEFLEET_API_KEY", "  sk-live  ");
    let config = Config::parse_toml("").unwrap();
    assert_eq!(config.inference.api_key.as_deref(), Some("sk-live"));

    std::env::set_var("NODEFLEET_API_KEY", "   ");
    let config = Config::parse_toml("").unwrap();
    assert!(config.inference.api_key.is_none());

    std::env::remove_var("NODEFLEET_API_KEY");
    let config = Config::parse_toml("[inference]\napi_key = \"ignored\"\n").unwrap();
    assert!(config.inference.api_key.is_none());
}

#[test]
fn load_reads_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[fleet]\nroot = \"/srv/fleet\"\nnodes_per_wallet = 4\n\n[runtime]\ncompose_command = [\"docker-compose\"]\n",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.fleet.root.as_deref(), Some(std::path::Path::new("/srv/fleet")));
    assert_eq!(config.fleet.nodes_per_wallet, 4);
    assert_eq!(config.runtime.compose_command, ["docker-compose"]);
}

#[test]
fn load_of_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));

    let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.fleet.image, "compute-node:latest");
}

#[test]
fn installer_requirements_are_replaceable() {
    let toml = r#"
[installer]
package_manager = "apt"

[[installer.requirements]]
binary = "docker"
package = "docker-ce"
"#;
    let config = Config::parse_toml(toml).unwrap();
    assert_eq!(config.installer.package_manager, "apt");
    assert_eq!(
        config.installer.requirements,
        [ToolRequirement::new("docker", "docker-ce")]
    );
}

#[test]
fn empty_compose_command_is_rejected() {
    let err = Config::parse_toml("[runtime]\ncompose_command = []\n").unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::MissingField {
            field: "runtime.compose_command"
        })
    ));
}
