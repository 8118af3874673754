//! Request/response envelope
//!
//! The two-field schema `{ "requestId": string, "payload": string }` that
//! every transport carries. Missing fields decode as empty strings.

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::RequestId};

/// Inbound or forwarded request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Request {
    /// Correlation identifier
    pub request_id: RequestId,
    /// Opaque request content
    pub payload: String,
}

impl Request {
    /// Create a request with the given id and payload
    pub fn new(request_id: impl Into<RequestId>, payload: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            payload: payload.into(),
        }
    }

    /// Create a request that only carries an id
    pub fn with_id(request_id: impl Into<RequestId>) -> Self {
        Self::new(request_id, String::new())
    }

    /// Decode a request from its JSON wire form
    pub fn from_json(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::MalformedEnvelope(e.to_string()))
    }
}

/// Response produced by a strategy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    /// Correlation identifier, always the inbound request's id once handled
    pub request_id: RequestId,
    /// Strategy-defined content
    pub payload: String,
}

impl Response {
    /// Create a response with the given id and payload
    pub fn new(request_id: impl Into<RequestId>, payload: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            payload: payload.into(),
        }
    }

    /// Create a response that carries only a payload
    ///
    /// The id is stamped later by the request handler.
    pub fn from_payload(payload: impl Into<String>) -> Self {
        Self::new(RequestId::default(), payload)
    }

    /// Decode a response from its JSON wire form
    pub fn from_json(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::MalformedEnvelope(e.to_string()))
    }
}
