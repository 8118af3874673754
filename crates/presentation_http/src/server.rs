//! HTTP/1.1 listener
//!
//! Binds immediately and serves on a background task so that the strategy
//! can be constructed with the running server in hand.

use std::{fmt, net::SocketAddr, sync::Arc};

use application::{ApplicationError, RequestHandler, ServerPort};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tracing::{debug, info};

use crate::{routes::create_router, state::AppState};

/// A running HTTP/1.1 server feeding a request handler
pub struct HttpServer {
    id: String,
    local_addr: SocketAddr,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<std::io::Result<()>>>>,
}

impl fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpServer")
            .field("id", &self.id)
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl HttpServer {
    /// Bind `addr` and start serving
    pub async fn bind(addr: &str, handler: Arc<RequestHandler>) -> Result<Self, ApplicationError> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            ApplicationError::Configuration(format!("failed to bind [{addr}]: {e}"))
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        let router = create_router(AppState::new(handler));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let id = format!("h1-{}", local_addr.port());
        info!(server = %id, %local_addr, "HTTP/1.1 server listening");

        Ok(Self {
            id,
            local_addr,
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            task: Mutex::new(Some(task)),
        })
    }

    /// Address actually bound, useful when binding port 0
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[async_trait]
impl ServerPort for HttpServer {
    fn id(&self) -> String {
        self.id.clone()
    }

    async fn shutdown(&self) -> Result<(), ApplicationError> {
        let shutdown_tx = self.shutdown_tx.lock().take();
        let task = self.task.lock().take();

        let (Some(shutdown_tx), Some(task)) = (shutdown_tx, task) else {
            debug!(server = %self.id, "Server already shut down");
            return Ok(());
        };

        info!(server = %self.id, "Shutting down HTTP/1.1 server");
        let _ = shutdown_tx.send(());

        match task.await {
            Ok(Ok(())) => {
                info!(server = %self.id, "HTTP/1.1 server stopped");
                Ok(())
            },
            Ok(Err(e)) => Err(ApplicationError::Transport(format!(
                "server [{}] failed: {e}",
                self.id
            ))),
            Err(e) => Err(ApplicationError::Internal(format!(
                "server [{}] task failed: {e}",
                self.id
            ))),
        }
    }
}
