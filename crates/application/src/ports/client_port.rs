//! Client port - Outbound connection to a downstream node

use async_trait::async_trait;
use domain::{Request, Response};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for sending requests to one downstream peer
///
/// Clients are shared between strategies and the service aggregate. Only
/// the aggregate closes them, once, at shutdown.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClientPort: Send + Sync {
    /// Stable identity, typically the downstream address
    fn id(&self) -> String;

    /// Forward a request and wait for the downstream response
    async fn send(&self, request: &Request) -> Result<Response, ApplicationError>;

    /// Release the underlying connection
    async fn close(&self) -> Result<(), ApplicationError>;
}
