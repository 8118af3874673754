//! HTTP/1.1 presentation layer
//!
//! Accepts envelopes over HTTP/1.1 and hands them to the node's
//! request handler.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use server::HttpServer;
pub use state::AppState;
