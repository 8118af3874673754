//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: inbound listener settings
//! - `downstream`: peers to forward to
//! - `logging`: log filter and output format
//!
//! The node's behavior knobs live in [`application::ServiceConfig`] and are
//! embedded under the `service` key.

mod downstream;
mod logging;
mod server;

use std::path::Path;

use application::{ApplicationError, ServiceConfig, StrategyKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use downstream::DownstreamConfig;
pub use logging::{LogConfig, LogFormat};
pub use server::ServerConfig;

use crate::{grpc::parse_grpc_target, http::parse_http_url};

/// Prefix for environment overrides, e.g. `BB__SERVICE__PERCENT_FAILURE=10`
pub const ENV_PREFIX: &str = "BB";

/// Separator between prefix and nested keys in environment overrides
pub const ENV_SEPARATOR: &str = "__";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Per-node behavior
    #[serde(default)]
    pub service: ServiceConfig,

    /// Inbound listeners
    #[serde(default)]
    pub server: ServerConfig,

    /// Downstream peers
    #[serde(default)]
    pub downstream: DownstreamConfig,

    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// Without an explicit path, `bb.toml` (or any supported extension) in
    /// the working directory is read if present. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("bb").required(false),
        };

        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("log.filter", "info")?
            .set_default("log.format", "text")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("downstream.h1_servers")
                    .with_list_parse_key("downstream.grpc_servers")
                    .with_list_parse_key("downstream.grpc_authorities")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Reject out-of-range percentages and malformed downstream addresses
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.service.validate()?;

        for target in &self.downstream.grpc_servers {
            parse_grpc_target(target).map_err(|e| {
                ApplicationError::Configuration(format!("invalid downstream [{target}]: {e}"))
            })?;
        }
        self.downstream.validate_grpc_authorities()?;

        for server in &self.downstream.h1_servers {
            parse_http_url(server).map_err(|e| {
                ApplicationError::Configuration(format!("invalid downstream [{server}]: {e}"))
            })?;
        }

        Ok(())
    }

    /// Identity used when none was configured:
    /// `{strategy}-grpc:{grpc_port}-h1:{h1_port}`
    ///
    /// A port is `-1` when that listener is not configured.
    pub fn default_node_id(&self, strategy: StrategyKind) -> String {
        let grpc = self.server.grpc_port.map_or(-1, i32::from);
        let h1 = self.server.h1_port.map_or(-1, i32::from);
        format!("{strategy}-grpc:{grpc}-h1:{h1}")
    }

    /// Fill in a blank node id with [`AppConfig::default_node_id`]
    pub fn resolve_node_id(&mut self, strategy: StrategyKind) {
        if self.service.id.trim().is_empty() {
            self.service.id = self.default_node_id(strategy);
        }
    }
}
