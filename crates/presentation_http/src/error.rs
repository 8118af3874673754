//! API error handling
//!
//! Every failure surfaces as HTTP 500 with the raw error text as the body,
//! so callers further up a chain can read exactly what went wrong.

use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use thiserror::Error;
use tracing::{info, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body was not a valid envelope
    #[error(transparent)]
    Decode(#[from] DomainError),

    /// The request handler failed
    #[error(transparent)]
    Handler(#[from] ApplicationError),
}

impl ApiError {
    /// Status code this error maps to
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Whether the failure was injected on purpose
    pub const fn is_injected(&self) -> bool {
        matches!(self, Self::Handler(e) if e.is_injected())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();
        if self.is_injected() {
            info!(status = status.as_u16(), error = %message, "Returning injected failure");
        } else {
            warn!(status = status.as_u16(), error = %message, "Request failed");
        }
        (status, message).into_response()
    }
}
