//! Downstream peer configuration.

use application::ApplicationError;
use serde::{Deserialize, Serialize};

/// Peers this node forwards requests to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownstreamConfig {
    /// `http(s)://host:port` URLs of HTTP/1.1 downstream nodes
    #[serde(default)]
    pub h1_servers: Vec<String>,

    /// `host:port` targets of gRPC downstream nodes
    #[serde(default)]
    pub grpc_servers: Vec<String>,

    /// Authority to send to each gRPC downstream, matched by position
    #[serde(default)]
    pub grpc_authorities: Vec<String>,
}

impl DownstreamConfig {
    /// Authority override for the gRPC downstream at `index`
    pub fn grpc_authority(&self, index: usize) -> Option<&str> {
        self.grpc_authorities
            .get(index)
            .map(String::as_str)
            .filter(|authority| !authority.is_empty())
    }

    /// Authorities are either absent or given once per gRPC downstream
    pub fn validate_grpc_authorities(&self) -> Result<(), ApplicationError> {
        if self.grpc_authorities.is_empty()
            || self.grpc_authorities.len() == self.grpc_servers.len()
        {
            return Ok(());
        }

        Err(ApplicationError::Configuration(format!(
            "{} gRPC downstream authorities given for {} gRPC downstream servers",
            self.grpc_authorities.len(),
            self.grpc_servers.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grpc(servers: &[&str], authorities: &[&str]) -> DownstreamConfig {
        DownstreamConfig {
            grpc_servers: servers.iter().map(ToString::to_string).collect(),
            grpc_authorities: authorities.iter().map(ToString::to_string).collect(),
            ..DownstreamConfig::default()
        }
    }

    #[test]
    fn authorities_are_matched_by_position() {
        let config = grpc(&["a:1", "b:2"], &["alpha", ""]);
        assert_eq!(config.grpc_authority(0), Some("alpha"));
        assert_eq!(config.grpc_authority(1), None);
        assert_eq!(config.grpc_authority(2), None);
    }

    #[test]
    fn authority_count_must_match_servers() {
        assert!(grpc(&["a:1", "b:2"], &[]).validate_grpc_authorities().is_ok());
        assert!(grpc(&["a:1", "b:2"], &["x", "y"]).validate_grpc_authorities().is_ok());

        let err = grpc(&["a:1", "b:2"], &["x"])
            .validate_grpc_authorities()
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}
