//! Server port - Inbound listener handle

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for a running listener that feeds the request handler
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ServerPort: Send + Sync {
    /// Stable identity, e.g. `h1-8080`
    fn id(&self) -> String;

    /// Stop accepting requests and wait for the listener to exit
    async fn shutdown(&self) -> Result<(), ApplicationError>;
}
