//! Envelope handler
//!
//! Decodes the JSON envelope, runs it through the request handler and
//! returns the JSON response.

use axum::{Json, body::Bytes, extract::State};
use domain::{Request, RequestId, Response};
use tracing::{debug, instrument};

use crate::{error::ApiError, state::AppState};

/// Transport tag used when minting request ids
pub const TRANSPORT: &str = "http";

/// Handle one envelope
///
/// An empty body is accepted and gets a freshly minted request id.
#[instrument(skip(state, body), fields(node = %state.handler.config().id, body_len = body.len()))]
pub async fn handle_envelope(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Response>, ApiError> {
    let request = if body.is_empty() {
        let request_id = RequestId::mint(TRANSPORT, &state.handler.config().id);
        debug!(request_id = %request_id, "Empty body, minted request id");
        Request::with_id(request_id)
    } else {
        Request::from_json(&body)?
    };

    let response = state.handler.handle(&request).await?;
    Ok(Json(response))
}
