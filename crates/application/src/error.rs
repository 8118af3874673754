//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Strategy or topology wiring is invalid; fatal at startup
    #[error("Construction failed: {0}")]
    Construction(String),

    /// Synthetic failure drawn by the request handler
    #[error("this error was injected by [{node_id}]")]
    InjectedFailure {
        /// Identity of the node that injected the failure
        node_id: String,
    },

    /// A downstream client failed
    #[error("downstream server [{client}] returned error: {message}")]
    Downstream {
        /// Identity of the failing client
        client: String,
        /// Error reported by the client
        message: String,
    },

    /// An egress call answered outside the 2xx range
    #[error("unexpected status returned by [{url}] for request id [{request_id}]: {status}")]
    UnexpectedStatus {
        /// URL that was invoked
        url: String,
        /// Request the call was made for
        request_id: String,
        /// Status code received
        status: u16,
    },

    /// One or more broadcast targets failed; messages joined by commas
    #[error("{}", .0.join(","))]
    Aggregated(Vec<String>),

    /// Transport-level failure talking to a peer
    #[error("Transport error: {0}")]
    Transport(String),

    /// Servers or clients failed to release during shutdown
    #[error("errors found closing connections: [{}]", .0.join(", "))]
    Shutdown(Vec<String>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Wrap a client failure with the client's identity
    pub fn downstream(client: impl Into<String>, error: &impl ToString) -> Self {
        Self::Downstream {
            client: client.into(),
            message: error.to_string(),
        }
    }

    /// Whether this error was produced by failure injection
    pub const fn is_injected(&self) -> bool {
        matches!(self, Self::InjectedFailure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn injected_failure_names_node() {
        let err = ApplicationError::InjectedFailure {
            node_id: "terminus-grpc:-1-h1:9090".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "this error was injected by [terminus-grpc:-1-h1:9090]"
        );
        assert!(err.is_injected());
    }

    #[test]
    fn downstream_wraps_client_message() {
        let err = ApplicationError::downstream("http://b:8080", &"connection refused");
        assert_eq!(
            err.to_string(),
            "downstream server [http://b:8080] returned error: connection refused"
        );
        assert!(!err.is_injected());
    }

    #[test]
    fn aggregated_joins_with_commas() {
        let err = ApplicationError::Aggregated(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "a,b");
    }

    #[test]
    fn unexpected_status_carries_context() {
        let err = ApplicationError::UnexpectedStatus {
            url: "http://x/status/503".to_string(),
            request_id: "req-1".to_string(),
            status: 503,
        };
        let msg = err.to_string();
        assert!(msg.contains("http://x/status/503"));
        assert!(msg.contains("req-1"));
        assert!(msg.contains("503"));
    }

    #[test]
    fn shutdown_lists_every_failure() {
        let err = ApplicationError::Shutdown(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(
            err.to_string(),
            "errors found closing connections: [one, two]"
        );
    }

    #[test]
    fn domain_errors_are_transparent() {
        let err: ApplicationError = DomainError::MalformedEnvelope("eof".to_string()).into();
        assert_eq!(err.to_string(), "Malformed envelope: eof");
    }
}
