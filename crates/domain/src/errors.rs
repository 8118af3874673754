//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Envelope bytes could not be decoded
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_envelope_message() {
        let err = DomainError::MalformedEnvelope("expected value".to_string());
        assert_eq!(err.to_string(), "Malformed envelope: expected value");
    }
}
