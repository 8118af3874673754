//! Route definitions

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

/// Create the router; every method on every path reaches the envelope handler
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(handlers::envelope::handle_envelope)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
