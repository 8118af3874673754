//! Generated protobuf and gRPC bindings for the envelope service
//!
//! The wire messages mirror the envelope one to one, so conversions to and
//! from the domain types live here too.

use domain::{Request, Response};

/// Namespace for the generated package.
#[allow(clippy::all, clippy::pedantic, clippy::nursery, missing_debug_implementations)]
pub mod buoyantio {
    pub mod bb {
        tonic::include_proto!("buoyantio.bb");
    }
}

pub use buoyantio::bb::{
    TheRequest, TheResponse, the_service_client::TheServiceClient,
    the_service_server::{TheService, TheServiceServer},
};

impl From<&Request> for TheRequest {
    fn from(request: &Request) -> Self {
        Self {
            request_uid: request.request_id.to_string(),
            payload: request.payload.clone(),
        }
    }
}

impl From<TheRequest> for Request {
    fn from(request: TheRequest) -> Self {
        Self::new(request.request_uid, request.payload)
    }
}

impl From<Response> for TheResponse {
    fn from(response: Response) -> Self {
        Self {
            request_uid: response.request_id.to_string(),
            payload: response.payload,
        }
    }
}

impl From<TheResponse> for Response {
    fn from(response: TheResponse) -> Self {
        Self::new(response.request_uid, response.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_fields_map_to_wire_fields() {
        let wire = TheRequest::from(&Request::new("r-1", "ping"));
        assert_eq!(wire.request_uid, "r-1");
        assert_eq!(wire.payload, "ping");

        let back = Request::from(wire);
        assert_eq!(back, Request::new("r-1", "ping"));
    }

    #[test]
    fn empty_wire_request_has_empty_id() {
        let request = Request::from(TheRequest::default());
        assert!(request.request_id.is_empty());
        assert!(request.payload.is_empty());
    }

    #[test]
    fn response_fields_map_to_wire_fields() {
        let wire = TheResponse::from(Response::new("r-2", "pong"));
        assert_eq!(wire.request_uid, "r-2");
        assert_eq!(Response::from(wire), Response::new("r-2", "pong"));
    }
}
