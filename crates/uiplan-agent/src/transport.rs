//! Agent transport
//!
//! [`AgentTransport`] is the seam between the service and the agent process.
//! [`HttpAgentTransport`] talks to it over HTTP:
//! - `POST /initialize` with `{baseUrl, headless}`
//! - `POST /execute` with an [`AgentCommand`]
//! - `POST /close`
//! - `GET /health`

use crate::command::{AgentCommand, AgentResponse};
use crate::config::AgentConfig;
use crate::error::AgentError;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::{Duration, Instant};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection to an interaction agent
///
/// Every failure, including an unreachable agent, is returned as a failed
/// [`AgentResponse`].
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AgentTransport: Send + Sync {
    /// Open a browser context on `base_url`
    async fn initialize(&self, base_url: &str, headless: bool) -> AgentResponse;

    /// Run one command
    async fn execute(&self, command: &AgentCommand) -> AgentResponse;

    /// Close the browser and release its resources
    async fn close(&self) -> AgentResponse;

    /// Whether the agent answers its health check
    async fn is_available(&self) -> bool;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InitializeBody<'a> {
    base_url: &'a str,
    headless: bool,
}

/// HTTP transport built on `reqwest`
#[derive(Debug, Clone)]
pub struct HttpAgentTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentTransport {
    /// Create transport for `config.agent_url`
    ///
    /// # Errors
    /// `AgentError::ClientBuild` if the HTTP client cannot be constructed
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(AgentError::ClientBuild)?;

        Ok(Self::with_client(client, &config.agent_url))
    }

    /// Create transport over an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client, agent_url: &str) -> Self {
        Self {
            client,
            base_url: agent_url.trim_end_matches('/').to_string(),
        }
    }

    /// Agent base URL without a trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder, context: &str) -> AgentResponse {
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let error = format!("{context}: failed to communicate with agent: {e}");
                tracing::error!(%error, "agent request failed");
                return AgentResponse::failure(error, elapsed_ms(started));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let elapsed = elapsed_ms(started);

        if status != StatusCode::OK {
            let error = format!("{context}: agent returned status {}: {body}", status.as_u16());
            tracing::error!(%error, "agent request rejected");
            return AgentResponse::failure(error, elapsed);
        }

        serde_json::from_str(&body).unwrap_or_else(|e| {
            AgentResponse::failure(format!("{context}: malformed agent response: {e}"), elapsed)
        })
    }
}

#[async_trait::async_trait]
impl AgentTransport for HttpAgentTransport {
    async fn initialize(&self, base_url: &str, headless: bool) -> AgentResponse {
        tracing::debug!(agent = %self.base_url, base_url, headless, "initializing agent");
        let request = self
            .client
            .post(self.endpoint("initialize"))
            .json(&InitializeBody { base_url, headless });
        self.send(request, "initialize").await
    }

    async fn execute(&self, command: &AgentCommand) -> AgentResponse {
        tracing::debug!(command = ?command.command_type(), target = command.target(), "executing command");
        let request = self.client.post(self.endpoint("execute")).json(command);
        self.send(request, "execute").await
    }

    async fn close(&self) -> AgentResponse {
        let request = self
            .client
            .post(self.endpoint("close"))
            .timeout(CLOSE_TIMEOUT);
        self.send(request, "close").await
    }

    async fn is_available(&self) -> bool {
        let result = self
            .client
            .get(self.endpoint("health"))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == StatusCode::OK,
            Err(e) => {
                tracing::debug!(error = %e, "agent health check failed");
                false
            }
        }
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandType;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one HTTP exchange and hand back the raw request
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (url, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn transport(url: &str) -> HttpAgentTransport {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpAgentTransport::with_client(client, url)
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let transport = HttpAgentTransport::new(
            &AgentConfig::new().with_agent_url("http://localhost:3000/"),
        )
        .unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3000");
        assert_eq!(transport.endpoint("execute"), "http://localhost:3000/execute");
    }

    #[tokio::test]
    async fn execute_posts_command_and_parses_reply() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"success":true,"message":"Clicked","data":{"screenshot":"/tmp/s.png"},"executionTimeMs":12}"#,
        )
        .await;

        let response = transport(&url)
            .execute(&AgentCommand::click("#go", Some("Go".into())))
            .await;

        assert!(response.success);
        assert_eq!(response.screenshot(), Some("/tmp/s.png"));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /execute "));
        assert!(request.contains(r#""type":"CLICK""#));
        assert!(request.contains(r##""target":"#go""##));
    }

    #[tokio::test]
    async fn initialize_sends_camel_case_body() {
        let (url, server) = serve_once("200 OK", r#"{"success":true}"#).await;

        let response = transport(&url)
            .initialize("http://app:8080", false)
            .await;
        assert!(response.success);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /initialize "));
        assert!(request.contains(r#""baseUrl":"http://app:8080""#));
        assert!(request.contains(r#""headless":false"#));
    }

    #[tokio::test]
    async fn non_ok_status_becomes_failure() {
        let (url, server) = serve_once("500 Internal Server Error", r#"{"error":"page crashed"}"#).await;

        let response = transport(&url)
            .execute(&AgentCommand::explain(None))
            .await;

        assert!(!response.success);
        let error = response.error.unwrap();
        assert!(error.contains("500"), "{error}");
        assert!(error.contains("page crashed"), "{error}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn malformed_body_becomes_failure() {
        let (url, server) = serve_once("200 OK", "not json").await;

        let response = transport(&url).close().await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("malformed"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_agent_is_failure_not_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let transport = transport(&url);
        let response = transport
            .execute(&AgentCommand::new(CommandType::Screenshot, None, None))
            .await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("failed to communicate"));
        assert!(!transport.is_available().await);
    }

    #[tokio::test]
    async fn health_check_reports_ok() {
        let (url, server) = serve_once("200 OK", r#"{"status":"ok"}"#).await;

        assert!(transport(&url).is_available().await);
        assert!(server.await.unwrap().starts_with("GET /health "));
    }
}
