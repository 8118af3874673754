//! Request correlation identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque correlation identifier carried by every envelope
///
/// The content is never interpreted; it only needs to survive every hop
/// unchanged. Ingress adapters mint one when the caller did not supply it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier for a request that arrived without one
    ///
    /// The result has the shape `in:{transport}-sid:{node_id}-{suffix}` where
    /// the suffix is a random UUID.
    pub fn mint(transport: &str, node_id: &str) -> Self {
        Self(format!(
            "in:{transport}-sid:{node_id}-{}",
            Uuid::new_v4().simple()
        ))
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
