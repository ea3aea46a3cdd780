//! Docker CLI adapter for the container runtime port.
//!
//! Shells out to `docker` for network management and to the configured
//! compose command (`docker compose` by default) for group lifecycle. The
//! definition file is always passed with `-f`; the working directory of
//! this process is never changed.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::runtime::{ContainerRuntime, LogOptions};

/// Exit code a shell reports for a child stopped by SIGINT.
const INTERRUPTED: i32 = 130;

#[derive(Debug, Clone)]
pub struct DockerCompose {
    binary: String,
    compose: Vec<String>,
}

impl DockerCompose {
    /// # Errors
    ///
    /// Returns a configuration error if `compose_command` is empty.
    pub fn new(binary: impl Into<String>, compose_command: Vec<String>) -> Result<Self> {
        if compose_command.is_empty() {
            return Err(ConfigError::MissingField {
                field: "runtime.compose_command",
            }
            .into());
        }
        Ok(Self {
            binary: binary.into(),
            compose: compose_command,
        })
    }

    /// Report the compose plugin version, failing if it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns an external service error if the compose command fails.
    pub fn compose_version(&self) -> Result<String> {
        let mut cmd = self.compose_base();
        cmd.args(["version", "--short"]);
        let output = run(cmd, "compose version")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn compose_base(&self) -> Command {
        let mut cmd = Command::new(&self.compose[0]);
        cmd.args(&self.compose[1..]);
        cmd
    }

    fn compose_with<I, S>(&self, definition: &Path, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = self.compose_base();
        cmd.arg("-f").arg(definition).args(args);
        cmd
    }

    fn network_inspect(&self, network: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["network", "inspect", network]);
        cmd
    }

    fn network_create(&self, network: &str, subnet: &str) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "network", "create", "--driver", "bridge", "--subnet", subnet, network,
        ]);
        cmd
    }

    fn logs_command(&self, definition: &Path, options: LogOptions) -> Command {
        let tail = options.tail.to_string();
        let mut cmd = self.compose_with(definition, ["logs", "--tail", tail.as_str()]);
        if options.follow {
            cmd.arg("-f");
        }
        cmd
    }
}

/// Run `cmd` to completion, capturing output, and fail on non-zero exit.
fn run(mut cmd: Command, what: &str) -> Result<Output> {
    debug!(command = ?cmd, "running");
    let output = cmd
        .output()
        .map_err(|e| Error::external(what, format!("could not execute: {e}")))?;
    if output.status.success() {
        return Ok(output);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let detail = if stderr.trim().is_empty() {
        stdout.trim().to_string()
    } else {
        stderr.trim().to_string()
    };
    Err(Error::external(
        what,
        format!("{} ({})", detail, output.status),
    ))
}

/// Run `cmd` with its progress shown on stderr, failing on non-zero exit.
///
/// Child stdout is redirected to stderr so `--json` output stays parseable.
fn stream(mut cmd: Command, what: &str) -> Result<()> {
    debug!(command = ?cmd, "streaming");
    let status = cmd
        .stdout(Stdio::from(std::io::stderr()))
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| Error::external(what, format!("could not execute: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::external(what, status.to_string()))
    }
}

impl ContainerRuntime for DockerCompose {
    fn name(&self) -> &'static str {
        "docker"
    }

    fn network_exists(&self, network: &str) -> Result<bool> {
        let mut cmd = self.network_inspect(network);
        debug!(command = ?cmd, "running");
        let output = cmd
            .output()
            .map_err(|e| Error::external("network inspect", format!("could not execute: {e}")))?;
        Ok(output.status.success())
    }

    fn create_network(&self, network: &str, subnet: &str) -> Result<()> {
        run(self.network_create(network, subnet), "network create")?;
        Ok(())
    }

    fn up(&self, definition: &Path) -> Result<()> {
        stream(self.compose_with(definition, ["up", "-d", "--build"]), "compose up")
    }

    fn down(&self, definition: &Path) -> Result<()> {
        stream(self.compose_with(definition, ["down"]), "compose down")
    }

    fn logs(&self, definition: &Path, options: LogOptions) -> Result<()> {
        let mut cmd = self.logs_command(definition, options);
        debug!(command = ?cmd, "streaming");
        // Output goes straight to the terminal.
        let status = cmd
            .status()
            .map_err(|e| Error::external("compose logs", format!("could not execute: {e}")))?;

        if status.success() {
            return Ok(());
        }
        // An interrupted follow ends that group's stream.
        if options.follow && status.code().map_or(true, |code| code == INTERRUPTED) {
            return Ok(());
        }
        Err(Error::external("compose logs", status.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cmd: &Command) -> Vec<String> {
        std::iter::once(cmd.get_program())
            .chain(cmd.get_args())
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn docker() -> DockerCompose {
        DockerCompose::new("docker", vec!["docker".into(), "compose".into()]).unwrap()
    }

    #[test]
    fn empty_compose_command_is_rejected() {
        assert!(DockerCompose::new("docker", vec![]).is_err());
    }

    #[test]
    fn network_commands() {
        let d = docker();
        assert_eq!(
            args(&d.network_inspect("fleet_net")),
            ["docker", "network", "inspect", "fleet_net"]
        );
        assert_eq!(
            args(&d.network_create("fleet_net", "172.28.0.0/16")),
            [
                "docker",
                "network",
                "create",
                "--driver",
                "bridge",
                "--subnet",
                "172.28.0.0/16",
                "fleet_net"
            ]
        );
    }

    #[test]
    fn compose_commands_pass_definition_explicitly() {
        let d = docker();
        let def = Path::new("/srv/fleet/node_group_ab/docker-compose.yml");
        assert_eq!(
            args(&d.compose_with(def, ["up", "-d", "--build"])),
            [
                "docker",
                "compose",
                "-f",
                "/srv/fleet/node_group_ab/docker-compose.yml",
                "up",
                "-d",
                "--build"
            ]
        );
        assert!(d.compose_with(def, ["down"]).get_current_dir().is_none());
    }

    #[test]
    fn logs_command_honours_options() {
        let d = docker();
        let def = Path::new("g/docker-compose.yml");

        let plain = args(&d.logs_command(def, LogOptions::default()));
        assert_eq!(plain[3..], ["g/docker-compose.yml", "logs", "--tail", "100"]);

        let follow = args(&d.logs_command(
            def,
            LogOptions {
                tail: 5,
                follow: true,
            },
        ));
        assert_eq!(follow.last().map(String::as_str), Some("-f"));
        assert!(follow.contains(&"5".to_string()));
    }

    #[test]
    fn legacy_compose_binary_is_supported() {
        let d = DockerCompose::new("docker", vec!["docker-compose".into()]).unwrap();
        let cmd = d.compose_with(Path::new("x.yml"), ["down"]);
        assert_eq!(args(&cmd), ["docker-compose", "-f", "x.yml", "down"]);
    }

    #[cfg(unix)]
    #[test]
    fn streamed_commands_report_exit_status() {
        assert!(stream(Command::new("true"), "compose up").is_ok());

        let err = stream(Command::new("false"), "compose up").unwrap_err();
        assert!(
            matches!(&err, Error::ExternalService { service, .. } if service == "compose up"),
            "{err:?}"
        );

        let missing = stream(Command::new("nodefleet-no-such-binary"), "compose down");
        assert!(matches!(missing, Err(Error::ExternalService { .. })));
    }
}
