//! Strategy port - What a node does with a request

use async_trait::async_trait;
use domain::{Request, Response};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the behavior a node applies after latency and failure injection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StrategyPort: Send + Sync {
    /// Produce a response for the request
    ///
    /// The response id does not need to be set; the request handler stamps
    /// the inbound id on every successful response.
    async fn execute(&self, request: &Request) -> Result<Response, ApplicationError>;
}
