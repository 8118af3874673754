//! gRPC presentation layer
//!
//! Accepts envelopes through the unary `theFunction` call and hands them to
//! the node's request handler.

pub mod server;
pub mod service;

pub use server::GrpcServer;
pub use service::EnvelopeService;
