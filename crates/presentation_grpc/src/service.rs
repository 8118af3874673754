//! Envelope service
//!
//! A request without an id gets a freshly minted one. Handler failures are
//! returned as `Unknown` statuses carrying the error text.

use std::sync::Arc;

use application::{ApplicationError, RequestHandler};
use async_trait::async_trait;
use bb_proto::{TheRequest, TheResponse, TheService};
use domain::{Request, RequestId};
use tonic::Status;
use tracing::{debug, info, instrument, warn};

/// Transport tag used when minting request ids
pub const TRANSPORT: &str = "grpc";

/// gRPC face of a node's request handler
#[derive(Debug, Clone)]
pub struct EnvelopeService {
    handler: Arc<RequestHandler>,
}

impl EnvelopeService {
    /// Serve requests with `handler`
    pub const fn new(handler: Arc<RequestHandler>) -> Self {
        Self { handler }
    }
}

fn to_status(error: &ApplicationError) -> Status {
    if error.is_injected() {
        info!(error = %error, "Returning injected failure");
    } else {
        warn!(error = %error, "Request failed");
    }
    Status::unknown(error.to_string())
}

#[async_trait]
impl TheService for EnvelopeService {
    #[instrument(skip(self, request), fields(node = %self.handler.config().id))]
    async fn the_function(
        &self,
        request: tonic::Request<TheRequest>,
    ) -> Result<tonic::Response<TheResponse>, Status> {
        let mut envelope = Request::from(request.into_inner());
        if envelope.request_id.is_empty() {
            envelope.request_id = RequestId::mint(TRANSPORT, &self.handler.config().id);
            debug!(request_id = %envelope.request_id, "Missing request id, minted one");
        }

        let response = self
            .handler
            .handle(&envelope)
            .await
            .map_err(|e| to_status(&e))?;

        Ok(tonic::Response::new(response.into()))
    }
}
