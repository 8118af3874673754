//! Application layer - Request orchestration and strategies
//!
//! Contains the per-request orchestrator, the capability ports that
//! transports implement, the behavioral strategies and the service
//! aggregate that owns a running node.

pub mod config;
pub mod error;
pub mod ports;
pub mod services;
pub mod strategies;

pub use config::ServiceConfig;
pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
pub use strategies::{StrategyConstructor, StrategyKind, StrategyRegistry};
