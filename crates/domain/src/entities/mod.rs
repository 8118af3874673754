//! Domain entities - Objects exchanged between nodes

mod envelope;

pub use envelope::{Request, Response};
