//! Inference service adapters: a detached child process and an
//! OpenAI-compatible completion endpoint.

use std::fs::OpenOptions;
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::process::{Command, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::port::outbound::inference::{CompletionProbe, ProbeResponse, ServiceSpawner, SpawnSpec};

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Starts the inference binary as a background process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSpawner;

impl ServiceSpawner for ProcessSpawner {
    fn spawn(&self, spec: &SpawnSpec) -> Result<u32> {
        if let Some(parent) = spec.log_file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&spec.log_file)?;
        let stderr = log.try_clone()?;

        let mut cmd = Command::new(&spec.binary);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(stderr));

        // Own process group, so a terminal interrupt does not reach it.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        debug!(spec = ?spec, "spawning inference service");
        let child = cmd.spawn().map_err(|e| {
            Error::external(
                "inference service",
                format!("could not start {}: {e}", spec.binary.display()),
            )
        })?;
        Ok(child.id())
    }

    fn is_serving(&self, port: u16) -> bool {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
        TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok()
    }
}

/// Chat-completions client used for the smoke test.
#[derive(Debug, Clone)]
pub struct HttpCompletionProbe {
    client: Client,
    url: String,
}

impl HttpCompletionProbe {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[derive(Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[async_trait]
impl CompletionProbe for HttpCompletionProbe {
    async fn complete(&self, api_key: &str, model: &str, prompt: &str) -> Result<ProbeResponse> {
        let request = Request {
            model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "smoke test response");
        Ok(ProbeResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::net::TcpListener;

    use anyhow::Result;
    use mockito::{Matcher, Server};

    use super::*;

    #[tokio::test]
    async fn sends_bearer_authenticated_chat_completion() -> Result<()> {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::Json(serde_json::json!({
                "model": "llama3.2:1b",
                "messages": [{"role": "user", "content": "ping"}]
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let probe = HttpCompletionProbe::new(
            format!("{}/v1/chat/completions", server.url()),
            Duration::from_secs(5),
        )?;
        let response = probe.complete("sk-test", "llama3.2:1b", "ping").await?;

        assert!(response.is_success());
        assert!(response.body.contains("ok"));
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_returned_not_raised() -> Result<()> {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(401)
            .with_body("invalid api key")
            .create_async()
            .await;

        let probe = HttpCompletionProbe::new(server.url(), Duration::from_secs(5))?;
        let response = probe.complete("bad", "m", "p").await?;

        assert_eq!(response.status, 401);
        assert_eq!(response.body, "invalid api key");
        Ok(())
    }

    #[test]
    fn detects_listening_port() {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = listener.local_addr().unwrap().port();
        assert!(ProcessSpawner.is_serving(port));

        drop(listener);
        assert!(!ProcessSpawner.is_serving(port));
    }

    #[test]
    fn missing_binary_fails_to_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let spec = SpawnSpec {
            binary: dir.path().join("absent"),
            args: vec![],
            env: BTreeMap::new(),
            log_file: dir.path().join("logs/inference.log"),
        };

        let err = ProcessSpawner.spawn(&spec).unwrap_err();
        assert!(matches!(err, Error::ExternalService { .. }));
        assert!(spec.log_file.exists());
    }
}
