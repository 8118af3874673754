//! Inbound listener configuration.

use serde::{Deserialize, Serialize};

/// Inbound listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP/1.1 listener; no listener when unset
    #[serde(default)]
    pub h1_port: Option<u16>,

    /// Port for the gRPC listener; no listener when unset
    #[serde(default)]
    pub grpc_port: Option<u16>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            h1_port: None,
            grpc_port: None,
        }
    }
}

impl ServerConfig {
    /// Socket address for the HTTP/1.1 listener, if one is configured
    pub fn h1_addr(&self) -> Option<String> {
        self.h1_port.map(|port| format!("{}:{port}", self.host))
    }

    /// Socket address for the gRPC listener, if one is configured
    pub fn grpc_addr(&self) -> Option<String> {
        self.grpc_port.map(|port| format!("{}:{port}", self.host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_listener_by_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.h1_addr().is_none());
        assert!(config.grpc_addr().is_none());
    }

    #[test]
    fn h1_addr_joins_host_and_port() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            h1_port: Some(8080),
            grpc_port: Some(9090),
        };
        assert_eq!(config.h1_addr().as_deref(), Some("127.0.0.1:8080"));
        assert_eq!(config.grpc_addr().as_deref(), Some("127.0.0.1:9090"));
    }
}
