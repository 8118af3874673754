//! Every downstream client a node is configured with

use std::sync::Arc;

use application::{ApplicationError, ClientPort, FireAndForgetClient};
use tracing::info;

use super::{build_grpc_clients, build_http_clients};
use crate::config::AppConfig;

/// gRPC clients first, then HTTP/1.1 clients
///
/// Each one is wrapped in [`FireAndForgetClient`] when the node runs in
/// fire-and-forget mode.
pub fn build_clients(config: &AppConfig) -> Result<Vec<Arc<dyn ClientPort>>, ApplicationError> {
    let mut clients = build_grpc_clients(config)?;
    clients.extend(build_http_clients(config)?);

    if config.service.fire_and_forget {
        info!(clients = clients.len(), "Wrapping downstream clients as fire-and-forget");
        clients = clients.into_iter().map(FireAndForgetClient::wrap).collect();
    }

    Ok(clients)
}
