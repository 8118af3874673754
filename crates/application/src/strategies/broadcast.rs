//! Broadcast strategy - Fan out to every downstream in parallel

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use domain::{Request, Response};
use futures::{StreamExt, stream::FuturesUnordered};
use tracing::{error, info};

use super::{StrategyKind, topology_error};
use crate::{
    config::ServiceConfig,
    error::ApplicationError,
    ports::{ClientPort, ServerPort, StrategyPort},
};

/// Sends each request to every client concurrently
///
/// Succeeds only if every client succeeds; the payload is the comma-joined
/// client payloads in completion order. Sends run on their own tasks, so
/// they finish even if the inbound request is abandoned.
pub struct BroadcastStrategy {
    clients: Vec<Arc<dyn ClientPort>>,
}

impl fmt::Debug for BroadcastStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastStrategy")
            .field(
                "clients",
                &self.clients.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl BroadcastStrategy {
    /// Requires exactly one server and at least two clients
    pub fn build(
        _config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Self, ApplicationError> {
        if servers.len() != 1 || clients.len() < 2 {
            return Err(topology_error(
                StrategyKind::BroadcastChannel,
                "exactly 1 server and at least 2 clients",
                servers,
                clients,
            ));
        }

        Ok(Self {
            clients: clients.to_vec(),
        })
    }

    /// [`BroadcastStrategy::build`], type-erased for the registry
    pub fn construct(
        config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Arc<dyn StrategyPort>, ApplicationError> {
        Ok(Arc::new(Self::build(config, servers, clients)?))
    }
}

#[async_trait]
impl StrategyPort for BroadcastStrategy {
    async fn execute(&self, request: &Request) -> Result<Response, ApplicationError> {
        info!(
            request_id = %request.request_id,
            downstream = self.clients.len(),
            "Starting broadcast"
        );

        let shared = Arc::new(request.clone());
        let mut in_flight: FuturesUnordered<_> = self
            .clients
            .iter()
            .map(|client| {
                let client_id = client.id();
                let client = Arc::clone(client);
                let request = Arc::clone(&shared);
                let task = tokio::spawn(async move { client.send(&request).await });
                async move { (client_id, task.await) }
            })
            .collect();

        let mut payloads = Vec::with_capacity(self.clients.len());
        let mut failures = Vec::new();

        while let Some((client_id, outcome)) = in_flight.next().await {
            match outcome {
                Ok(Ok(response)) => payloads.push(response.payload),
                Ok(Err(e)) => {
                    error!(client = %client_id, error = %e, "Broadcast send failed");
                    failures.push(ApplicationError::downstream(client_id, &e).to_string());
                },
                Err(join_error) => {
                    error!(client = %client_id, error = %join_error, "Broadcast task aborted");
                    failures.push(ApplicationError::downstream(client_id, &join_error).to_string());
                },
            }
        }

        info!(
            request_id = %request.request_id,
            succeeded = payloads.len(),
            failed = failures.len(),
            "Finished broadcast"
        );

        if failures.is_empty() {
            Ok(Response::new(request.request_id.clone(), payloads.join(",")))
        } else {
            Err(ApplicationError::Aggregated(failures))
        }
    }
}
