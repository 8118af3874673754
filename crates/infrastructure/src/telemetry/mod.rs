//! Logging initialization
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and a text or JSON
//! formatter. `RUST_LOG` overrides the configured filter.

mod logging;

pub use logging::{LoggingError, init_logging, parse_filter};
