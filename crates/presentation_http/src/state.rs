//! Application state shared across handlers

use std::sync::Arc;

use application::RequestHandler;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Per-request orchestrator for this node
    pub handler: Arc<RequestHandler>,
}

impl AppState {
    /// Create state around a request handler
    pub fn new(handler: Arc<RequestHandler>) -> Self {
        Self { handler }
    }
}
