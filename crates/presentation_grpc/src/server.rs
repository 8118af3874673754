//! gRPC listener
//!
//! Binds immediately and serves on a background task, like the HTTP/1.1
//! listener, so both can exist before the strategy is built.

use std::{fmt, net::SocketAddr, sync::Arc};

use application::{ApplicationError, RequestHandler, ServerPort};
use async_trait::async_trait;
use bb_proto::TheServiceServer;
use parking_lot::Mutex;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{debug, info};

use crate::service::EnvelopeService;

/// A running gRPC server feeding a request handler
pub struct GrpcServer {
    id: String,
    local_addr: SocketAddr,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<Result<(), tonic::transport::Error>>>>,
}

impl fmt::Debug for GrpcServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcServer")
            .field("id", &self.id)
            .field("local_addr", &self.local_addr)
            .finish_non_exhaustive()
    }
}

impl GrpcServer {
    /// Bind `addr` and start serving
    pub async fn bind(addr: &str, handler: Arc<RequestHandler>) -> Result<Self, ApplicationError> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            ApplicationError::Configuration(format!("failed to bind [{addr}]: {e}"))
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        let service = TheServiceServer::new(EnvelopeService::new(handler));
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            Server::builder()
                .trace_fn(|_| tracing::info_span!("grpc_envelope"))
                .add_service(service)
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let id = format!("grpc-{}", local_addr.port());
        info!(server = %id, %local_addr, "gRPC server listening");

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
impl ServerPort for GrpcServer {
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

        info!(server = %self.id, "Shutting down gRPC server");
        let _ = shutdown_tx.send(());

        match task.await {
            Ok(Ok(())) => {
                info!(server = %self.id, "gRPC server stopped");
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
