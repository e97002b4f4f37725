//! Connection settings of one host

use std::time::Duration;

use mc_api::HttpEndpoint;
use mc_sync::HostId;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};

/// Which transport observes the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportPreference {
    /// Persistent TCP session with pushed notifications, HTTP if it cannot be opened
    #[default]
    Push,
    /// HTTP only, state is polled
    PollOnly,
}

fn default_http_port() -> u16 {
    8080
}

fn default_tcp_port() -> u16 {
    9090
}

fn default_call_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Stable identity, also the scope of the host's library rows
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub transport: TransportPreference,
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl HostConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            http_port: default_http_port(),
            tcp_port: default_tcp_port(),
            username: None,
            password: None,
            transport: TransportPreference::default(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_transport(mut self, transport: TransportPreference) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_ports(mut self, http_port: u16, tcp_port: u16) -> Self {
        self.http_port = http_port;
        self.tcp_port = tcp_port;
        self
    }

    pub fn host_id(&self) -> HostId {
        HostId::new(self.id.clone())
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn http_endpoint(&self) -> HttpEndpoint {
        let endpoint = HttpEndpoint::new(self.address.clone(), self.http_port);
        match &self.username {
            Some(user) => endpoint.with_credentials(user.clone(), self.password.clone().unwrap_or_default()),
            None => endpoint,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SdkError::InvalidHost("id must not be empty".to_string()));
        }
        if self.address.trim().is_empty() {
            return Err(SdkError::InvalidHost(format!("host '{}' has no address", self.id)));
        }
        if self.http_port == 0 || self.tcp_port == 0 {
            return Err(SdkError::InvalidHost(format!("host '{}' has a zero port", self.id)));
        }
        if self.call_timeout_secs == 0 {
            return Err(SdkError::InvalidHost(format!("host '{}' has a zero call timeout", self.id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: HostConfig =
            serde_json::from_str(r#"{"id": "den", "name": "Den", "address": "10.0.0.5"}"#).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.tcp_port, 9090);
        assert_eq!(config.transport, TransportPreference::Push);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_endpoint_carries_credentials() {
        let config = HostConfig::new("den", "Den", "10.0.0.5").with_credentials("kodi", "pw");
        let endpoint = config.http_endpoint();
        assert_eq!(endpoint.url(), "http://10.0.0.5:8080/jsonrpc");
        assert_eq!(endpoint.username.as_deref(), Some("kodi"));
    }

    #[test]
    fn test_validate_rejects_missing_address() {
        let config = HostConfig::new("den", "Den", " ");
        assert!(matches!(config.validate(), Err(SdkError::InvalidHost(_))));
    }
}
