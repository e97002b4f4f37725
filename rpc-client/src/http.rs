//! Poll-only transport: one HTTP POST per call

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde_json::Value;

use crate::envelope::{parse_incoming, Incoming, Request};
use crate::error::TransportError;
use crate::{Transport, TransportKind};

/// Endpoint and credentials of an HTTP JSON-RPC host
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    pub address: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl HttpEndpoint {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Full URL of the JSON-RPC endpoint
    pub fn url(&self) -> String {
        format!("http://{}:{}/jsonrpc", self.address, self.port)
    }

    fn authorization(&self) -> Option<String> {
        let username = self.username.as_deref()?;
        let password = self.password.as_deref().unwrap_or("");
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", username, password));
        Some(format!("Basic {}", token))
    }
}

/// Request/response transport over HTTP
///
/// Each call is an independent POST; the host cannot push notifications
/// over this transport, so observers of state must poll.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: HttpEndpoint,
    agent: ureq::Agent,
    next_id: Arc<AtomicU64>,
}

impl HttpTransport {
    /// Create a transport with default timeouts (connect 5s, read 10s)
    pub fn new(endpoint: HttpEndpoint) -> Self {
        Self::with_timeouts(endpoint, Duration::from_secs(5), Duration::from_secs(10))
    }

    pub fn with_timeouts(endpoint: HttpEndpoint, connect: Duration, read: Duration) -> Self {
        Self {
            endpoint,
            agent: ureq::AgentBuilder::new()
                .timeout_connect(connect)
                .timeout_read(read)
                .build(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn endpoint(&self) -> &HttpEndpoint {
        &self.endpoint
    }

    fn post_blocking(
        agent: &ureq::Agent,
        endpoint: &HttpEndpoint,
        body: &str,
    ) -> Result<String, TransportError> {
        let mut request = agent
            .post(&endpoint.url())
            .set("Content-Type", "application/json");
        if let Some(auth) = endpoint.authorization() {
            request = request.set("Authorization", &auth);
        }

        let response = request.send_string(body).map_err(map_ureq_error)?;

        response
            .into_string()
            .map_err(|e| TransportError::Read(e.to_string()))
    }
}

fn map_ureq_error(error: ureq::Error) -> TransportError {
    match error {
        ureq::Error::Status(code, _) => TransportError::HttpStatus(code),
        ureq::Error::Transport(transport) => match transport.kind() {
            ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => {
                TransportError::Connect(transport.to_string())
            }
            ureq::ErrorKind::Io if transport.to_string().contains("timed out") => {
                TransportError::Timeout
            }
            _ => TransportError::Send(transport.to_string()),
        },
    }
}

/// Decode the body of an HTTP JSON-RPC response
pub(crate) fn decode_response_body(body: &str) -> Result<Value, TransportError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

    match parse_incoming(value)? {
        Incoming::Response { outcome, .. } => outcome,
        Incoming::Notification(n) => Err(TransportError::InvalidResponse(format!(
            "Unexpected notification {} in HTTP response",
            n.method
        ))),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn kind(&self) -> TransportKind {
        TransportKind::PollOnly
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_string(&Request::new(id, method, params))
            .map_err(|e| TransportError::Send(e.to_string()))?;

        tracing::trace!(method, id, "HTTP call");

        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let text = tokio::task::spawn_blocking(move || Self::post_blocking(&agent, &endpoint, &body))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))??;

        decode_response_body(&text)
    }
}
