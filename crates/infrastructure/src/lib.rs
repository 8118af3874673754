//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the reqwest and tonic downstream clients, the HTTP egress
//! strategy, configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod grpc;
pub mod http;
pub mod strategies;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, DownstreamConfig, LogConfig, LogFormat, ServerConfig};
pub use grpc::{build_channel, parse_grpc_target};
pub use http::{HttpClientSettings, X_REQUEST_ID, build_client, parse_http_url};
pub use strategies::default_strategy_registry;
pub use telemetry::{LoggingError, init_logging};
