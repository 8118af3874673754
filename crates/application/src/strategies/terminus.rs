//! Terminus strategy - Leaf node that answers locally

use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use domain::{Request, Response};

use super::{StrategyKind, topology_error};
use crate::{
    config::ServiceConfig,
    error::ApplicationError,
    ports::{ClientPort, ServerPort, StrategyPort},
};

/// Extra argument holding the fixed response text
pub const RESPONSE_TEXT_ARG: &str = "response-text";

/// Answers every request without contacting anyone
#[derive(Debug, Clone)]
pub struct TerminusStrategy {
    response_text: Option<String>,
}

impl TerminusStrategy {
    /// Requires at least one server and no clients
    pub fn build(
        config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Self, ApplicationError> {
        if servers.is_empty() || !clients.is_empty() {
            return Err(topology_error(
                StrategyKind::Terminus,
                "at least 1 server and no clients",
                servers,
                clients,
            ));
        }

        let response_text = config
            .extra_argument(RESPONSE_TEXT_ARG)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Ok(Self { response_text })
    }

    /// [`TerminusStrategy::build`], type-erased for the registry
    pub fn construct(
        config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Arc<dyn StrategyPort>, ApplicationError> {
        Ok(Arc::new(Self::build(config, servers, clients)?))
    }
}

#[async_trait]
impl StrategyPort for TerminusStrategy {
    async fn execute(&self, request: &Request) -> Result<Response, ApplicationError> {
        let payload = self.response_text.clone().unwrap_or_else(|| {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| elapsed.subsec_nanos());
            format!("terminus at [{nanos}]")
        });
        Ok(Response::new(request.request_id.clone(), payload))
    }
}
