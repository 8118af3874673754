//! Point-to-point strategy - Relay to a single downstream

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use domain::{Request, Response};
use tracing::debug;

use super::{StrategyKind, topology_error};
use crate::{
    config::ServiceConfig,
    error::ApplicationError,
    ports::{ClientPort, ServerPort, StrategyPort},
};

/// Forwards each request unchanged to its only client
pub struct PointToPointStrategy {
    client: Arc<dyn ClientPort>,
}

impl fmt::Debug for PointToPointStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointToPointStrategy")
            .field("client", &self.client.id())
            .finish()
    }
}

impl PointToPointStrategy {
    /// Requires exactly one server and exactly one client
    pub fn build(
        _config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Self, ApplicationError> {
        match (servers, clients) {
            ([_], [client]) => Ok(Self {
                client: Arc::clone(client),
            }),
            _ => Err(topology_error(
                StrategyKind::PointToPointChannel,
                "exactly 1 server and 1 client",
                servers,
                clients,
            )),
        }
    }

    /// [`PointToPointStrategy::build`], type-erased for the registry
    pub fn construct(
        config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Arc<dyn StrategyPort>, ApplicationError> {
        Ok(Arc::new(Self::build(config, servers, clients)?))
    }
}

#[async_trait]
impl StrategyPort for PointToPointStrategy {
    async fn execute(&self, request: &Request) -> Result<Response, ApplicationError> {
        debug!(client = %self.client.id(), request_id = %request.request_id, "Relaying request");
        self.client.send(request).await
    }
}
