//! Inference service launcher and remote smoke test.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::fs::write_atomic;
use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::inference::{CompletionProbe, ServiceSpawner, SpawnSpec};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// How to start the local inference binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub binary: PathBuf,
    pub args: Vec<String>,
    pub port: u16,
    /// Variable name the child reads its API key from.
    pub api_key_var: String,
    /// Variable name the child reads its port from.
    pub port_var: String,
    pub startup_timeout: Duration,
    pub log_file: PathBuf,
    pub pid_file: PathBuf,
}

/// What [`InferenceLauncher::launch`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The port was already serving; nothing was started.
    AlreadyRunning,
    /// A new process was started and its port became ready.
    Started { pid: u32 },
}

/// Result of the smoke test. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmokeOutcome {
    /// No endpoint configured.
    Skipped,
    /// The endpoint answered with a 2xx status.
    Passed { status: u16, body: String },
    /// The endpoint answered with a non-success status.
    Rejected { status: u16, body: String },
    /// No response was received.
    Unreachable { error: String },
}

/// Return the API key or fail before any side effect.
///
/// # Errors
///
/// Returns a configuration error when the key is missing or blank.
pub fn require_api_key(key: Option<&str>) -> Result<&str> {
    match key.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ConfigError::MissingField {
            field: "NODEFLEET_API_KEY",
        }
        .into()),
    }
}

pub struct InferenceLauncher<'a> {
    spawner: &'a dyn ServiceSpawner,
    probe: Option<&'a dyn CompletionProbe>,
}

impl<'a> InferenceLauncher<'a> {
    pub fn new(spawner: &'a dyn ServiceSpawner, probe: Option<&'a dyn CompletionProbe>) -> Self {
        Self { spawner, probe }
    }

    /// Start the inference binary unless its port is already serving, then
    /// wait for the port to accept connections.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a blank key, [`Error::NotFound`] if
    /// the binary does not exist, the spawner's error, or an external
    /// service error if the port is not ready within the startup timeout.
    pub async fn launch(&self, plan: &LaunchPlan, api_key: &str) -> Result<LaunchOutcome> {
        let api_key = require_api_key(Some(api_key))?;

        if self.spawner.is_serving(plan.port) {
            info!(port = plan.port, "inference service already running");
            return Ok(LaunchOutcome::AlreadyRunning);
        }

        if !plan.binary.is_file() {
            return Err(Error::NotFound {
                what: "inference binary",
                path: plan.binary.clone(),
            });
        }

        let mut env = BTreeMap::new();
        env.insert(plan.api_key_var.clone(), api_key.to_string());
        env.insert(plan.port_var.clone(), plan.port.to_string());
        let spec = SpawnSpec {
            binary: plan.binary.clone(),
            args: plan.args.clone(),
            env,
            log_file: plan.log_file.clone(),
        };

        let pid = self.spawner.spawn(&spec)?;
        write_atomic(&plan.pid_file, format!("{pid}\n").as_bytes(), None)?;
        info!(pid, port = plan.port, "started inference service");

        let deadline = Instant::now() + plan.startup_timeout;
        while !self.spawner.is_serving(plan.port) {
            if Instant::now() >= deadline {
                return Err(Error::external(
                    "inference service",
                    format!(
                        "port {} not ready after {}s (see {})",
                        plan.port,
                        plan.startup_timeout.as_secs(),
                        plan.log_file.display()
                    ),
                ));
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }

        Ok(LaunchOutcome::Started { pid })
    }

    /// Send one completion request to the remote endpoint.
    ///
    /// Failures are reported in the outcome and logged, never returned.
    pub async fn smoke_test(&self, api_key: &str, model: &str, prompt: &str) -> SmokeOutcome {
        let Some(probe) = self.probe else {
            return SmokeOutcome::Skipped;
        };

        match probe.complete(api_key, model, prompt).await {
            Ok(response) if response.is_success() => SmokeOutcome::Passed {
                status: response.status,
                body: response.body,
            },
            Ok(response) => {
                warn!(status = response.status, "smoke test rejected");
                SmokeOutcome::Rejected {
                    status: response.status,
                    body: response.body,
                }
            }
            Err(e) => {
                warn!(error = %e, "smoke test failed");
                SmokeOutcome::Unreachable {
                    error: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::port::outbound::inference::ProbeResponse;

    struct FakeSpawner {
        serving: AtomicBool,
        become_ready: bool,
        spawned: AtomicUsize,
    }

    impl FakeSpawner {
        fn new(serving: bool, become_ready: bool) -> Self {
            Self {
                serving: AtomicBool::new(serving),
                become_ready,
                spawned: AtomicUsize::new(0),
            }
        }
    }

    impl ServiceSpawner for FakeSpawner {
        fn spawn(&self, spec: &SpawnSpec) -> Result<u32> {
            assert_eq!(spec.env.get("API_KEY").map(String::as_str), Some("secret"));
            assert_eq!(spec.env.get("PORT").map(String::as_str), Some("11434"));
            self.spawned.fetch_add(1, Ordering::SeqCst);
            if self.become_ready {
                self.serving.store(true, Ordering::SeqCst);
            }
            Ok(4242)
        }

        fn is_serving(&self, _port: u16) -> bool {
            self.serving.load(Ordering::SeqCst)
        }
    }

    struct FixedProbe(std::result::Result<ProbeResponse, String>);

    #[async_trait]
    impl CompletionProbe for FixedProbe {
        async fn complete(&self, _: &str, _: &str, _: &str) -> Result<ProbeResponse> {
            self.0
                .clone()
                .map_err(|e| Error::external("completion endpoint", e))
        }
    }

    fn plan(dir: &std::path::Path, binary: PathBuf) -> LaunchPlan {
        LaunchPlan {
            binary,
            args: vec![],
            port: 11434,
            api_key_var: "API_KEY".into(),
            port_var: "PORT".into(),
            startup_timeout: Duration::from_millis(300),
            log_file: dir.join("inference.log"),
            pid_file: dir.join("inference.pid"),
        }
    }

    fn fake_binary(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("inference-server");
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        path
    }

    #[test]
    fn blank_api_key_is_a_configuration_error() {
        assert!(matches!(
            require_api_key(Some("   ")),
            Err(Error::Config(ConfigError::MissingField { .. }))
        ));
        assert!(require_api_key(None).is_err());
        assert_eq!(require_api_key(Some(" k ")).unwrap(), "k");
    }

    #[tokio::test]
    async fn starts_binary_and_records_pid() {
        let dir = tempfile::tempdir().unwrap();
        let spawner = FakeSpawner::new(false, true);
        let launcher = InferenceLauncher::new(&spawner, None);

        let plan = plan(dir.path(), fake_binary(dir.path()));
        let outcome = launcher.launch(&plan, "secret").await.unwrap();

        assert_eq!(outcome, LaunchOutcome::Started { pid: 4242 });
        assert_eq!(std::fs::read_to_string(&plan.pid_file).unwrap(), "4242\n");
    }

    #[tokio::test]
    async fn already_serving_port_skips_launch() {
        let dir = tempfile::tempdir().unwrap();
        let spawner = FakeSpawner::new(true, true);
        let launcher = InferenceLauncher::new(&spawner, None);

        // Binary does not even need to exist.
        let plan = plan(dir.path(), dir.path().join("absent"));
        let outcome = launcher.launch(&plan, "secret").await.unwrap();

        assert_eq!(outcome, LaunchOutcome::AlreadyRunning);
        assert_eq!(spawner.spawned.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_binary_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let spawner = FakeSpawner::new(false, true);
        let launcher = InferenceLauncher::new(&spawner, None);

        let err = launcher
            .launch(&plan(dir.path(), dir.path().join("absent")), "secret")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn port_never_ready_is_an_external_service_error() {
        let dir = tempfile::tempdir().unwrap();
        let spawner = FakeSpawner::new(false, false);
        let launcher = InferenceLauncher::new(&spawner, None);

        let err = launcher
            .launch(&plan(dir.path(), fake_binary(dir.path())), "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ExternalService { .. }));
    }

    #[tokio::test]
    async fn smoke_outcomes() {
        let spawner = FakeSpawner::new(true, true);

        let launcher = InferenceLauncher::new(&spawner, None);
        assert_eq!(launcher.smoke_test("k", "m", "p").await, SmokeOutcome::Skipped);

        let ok = FixedProbe(Ok(ProbeResponse {
            status: 200,
            body: "{}".into(),
        }));
        let launcher = InferenceLauncher::new(&spawner, Some(&ok));
        assert!(matches!(
            launcher.smoke_test("k", "m", "p").await,
            SmokeOutcome::Passed { status: 200, .. }
        ));

        let rejected = FixedProbe(Ok(ProbeResponse {
            status: 401,
            body: "bad key".into(),
        }));
        let launcher = InferenceLauncher::new(&spawner, Some(&rejected));
        assert_eq!(
            launcher.smoke_test("k", "m", "p").await,
            SmokeOutcome::Rejected {
                status: 401,
                body: "bad key".into()
            }
        );

        let down = FixedProbe(Err("connection refused".into()));
        let launcher = InferenceLauncher::new(&spawner, Some(&down));
        assert!(matches!(
            launcher.smoke_test("k", "m", "p").await,
            SmokeOutcome::Unreachable { .. }
        ));
    }
}
