//! Port definitions for application layer
//!
//! Ports are the capabilities the request handler and strategies depend on.
//! Transport adapters in the infrastructure and presentation layers
//! implement them.

mod client_port;
mod server_port;
mod strategy_port;

pub use client_port::ClientPort;
#[cfg(test)]
pub use client_port::MockClientPort;
pub use server_port::ServerPort;
#[cfg(test)]
pub use server_port::MockServerPort;
pub use strategy_port::StrategyPort;
#[cfg(test)]
pub use strategy_port::MockStrategyPort;
