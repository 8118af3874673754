//! Fire-and-forget client decorator

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use domain::{Request, Response};
use tracing::{info, warn};

use crate::{error::ApplicationError, ports::ClientPort};

/// Wraps a client so `send` returns a stub response immediately
///
/// The real send runs on a detached task; its outcome is only logged.
pub struct FireAndForgetClient {
    inner: Arc<dyn ClientPort>,
}

impl fmt::Debug for FireAndForgetClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FireAndForgetClient")
            .field("inner", &self.inner.id())
            .finish()
    }
}

impl FireAndForgetClient {
    /// Decorate a client
    pub fn new(inner: Arc<dyn ClientPort>) -> Self {
        Self { inner }
    }

    /// Decorate a client and erase the type
    pub fn wrap(inner: Arc<dyn ClientPort>) -> Arc<dyn ClientPort> {
        Arc::new(Self::new(inner))
    }
}

#[async_trait]
impl ClientPort for FireAndForgetClient {
    fn id(&self) -> String {
        self.inner.id()
    }

    async fn send(&self, request: &Request) -> Result<Response, ApplicationError> {
        let client_id = self.inner.id();
        let client = Arc::clone(&self.inner);
        let detached = request.clone();
        let target = client_id.clone();

        tokio::spawn(async move {
            info!(client = %target, request_id = %detached.request_id, "Sending fire-and-forget request");
            match client.send(&detached).await {
                Ok(response) => info!(
                    client = %target,
                    request_id = %detached.request_id,
                    payload = %response.payload,
                    "Fire-and-forget request completed"
                ),
                Err(e) => warn!(
                    client = %target,
                    request_id = %detached.request_id,
                    error = %e,
                    "Fire-and-forget request failed"
                ),
            }
        });

        Ok(Response::new(
            request.request_id.clone(),
            format!(
                "Stub response for fire-and-forget request to [{client_id}] for request id [{}]",
                request.request_id
            ),
        ))
    }

    async fn close(&self) -> Result<(), ApplicationError> {
        self.inner.close().await
    }
}
