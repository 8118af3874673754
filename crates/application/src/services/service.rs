//! Service aggregate - A running node and everything it owns

use std::{fmt, future::Future, sync::Arc};

use tracing::{error, info};

use super::request_handler::RequestHandler;
use crate::{
    error::ApplicationError,
    ports::{ClientPort, ServerPort},
    strategies::StrategyRegistry,
};

/// Why [`Service::run_until`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The external shutdown future resolved
    Interrupted,
    /// The termination threshold was reached
    TerminationThreshold,
}

/// Groups the handler, servers and clients of one node
///
/// The strategy is owned by the handler once bound.
///
/// The service is the only component that shuts servers down or closes
/// clients; strategies merely borrow them.
pub struct Service {
    handler: Arc<RequestHandler>,
    servers: Vec<Arc<dyn ServerPort>>,
    clients: Vec<Arc<dyn ClientPort>>,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("id", &self.handler.config().id)
            .field(
                "servers",
                &self.servers.iter().map(|s| s.id()).collect::<Vec<_>>(),
            )
            .field(
                "clients",
                &self.clients.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl Service {
    /// Group already-wired parts
    pub fn new(
        handler: Arc<RequestHandler>,
        servers: Vec<Arc<dyn ServerPort>>,
        clients: Vec<Arc<dyn ClientPort>>,
    ) -> Self {
        Self {
            handler,
            servers,
            clients,
        }
    }

    /// Build the named strategy over the given topology and bind it
    pub fn assemble(
        handler: Arc<RequestHandler>,
        servers: Vec<Arc<dyn ServerPort>>,
        clients: Vec<Arc<dyn ClientPort>>,
        registry: &StrategyRegistry,
        strategy_name: &str,
    ) -> Result<Self, ApplicationError> {
        let strategy = registry.build(strategy_name, handler.config(), &servers, &clients)?;
        handler.bind_strategy(strategy)?;
        info!(
            node = %handler.config().id,
            strategy = strategy_name,
            servers = servers.len(),
            clients = clients.len(),
            "Service assembled"
        );
        Ok(Self::new(handler, servers, clients))
    }

    /// The request handler
    pub fn handler(&self) -> &Arc<RequestHandler> {
        &self.handler
    }

    /// Inbound listeners
    pub fn servers(&self) -> &[Arc<dyn ServerPort>] {
        &self.servers
    }

    /// Downstream clients
    pub fn clients(&self) -> &[Arc<dyn ClientPort>] {
        &self.clients
    }

    /// Wait for either an external interrupt or the termination threshold
    pub async fn run_until<F>(&self, interrupt: F) -> StopReason
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            () = interrupt => {
                info!("Interrupt received");
                StopReason::Interrupted
            }
            () = self.handler.stopped() => {
                info!("Termination threshold reached");
                StopReason::TerminationThreshold
            }
        }
    }

    /// Shut down every server and close every client
    ///
    /// Keeps going past individual failures and reports all of them.
    pub async fn shutdown(&self) -> Result<(), ApplicationError> {
        let mut failures = Vec::new();

        for server in &self.servers {
            if let Err(e) = server.shutdown().await {
                error!(server = %server.id(), error = %e, "Failed to shut down server");
                failures.push(format!("server [{}]: {e}", server.id()));
            }
        }

        for client in &self.clients {
            if let Err(e) = client.close().await {
                error!(client = %client.id(), error = %e, "Failed to close client");
                failures.push(format!("client [{}]: {e}", client.id()));
            }
        }

        if failures.is_empty() {
            info!("Service shut down cleanly");
            Ok(())
        } else {
            Err(ApplicationError::Shutdown(failures))
        }
    }
}
