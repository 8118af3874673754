//! Domain layer for bb
//!
//! Contains the request/response envelope that crosses every transport,
//! the request-id value object and domain errors.
//! This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
