//! Strategies - What a node does with a request
//!
//! Every strategy is built once at startup from the node configuration
//! and the topology it was wired into. Construction validates the
//! topology so that a misconfigured node fails before serving traffic.

mod broadcast;
mod point_to_point;
mod registry;
mod terminus;

use std::sync::Arc;

pub use broadcast::BroadcastStrategy;
pub use point_to_point::PointToPointStrategy;
pub use registry::{StrategyConstructor, StrategyKind, StrategyRegistry};
pub use terminus::{RESPONSE_TEXT_ARG, TerminusStrategy};

use crate::{
    error::ApplicationError,
    ports::{ClientPort, ServerPort},
};

/// Build the construction error for a topology a strategy cannot run on
pub fn topology_error(
    kind: StrategyKind,
    requirement: &str,
    servers: &[Arc<dyn ServerPort>],
    clients: &[Arc<dyn ClientPort>],
) -> ApplicationError {
    let server_ids: Vec<String> = servers.iter().map(|s| s.id()).collect();
    let client_ids: Vec<String> = clients.iter().map(|c| c.id()).collect();
    ApplicationError::Construction(format!(
        "strategy [{kind}] requires {requirement}, got servers {server_ids:?} and clients {client_ids:?}"
    ))
}
