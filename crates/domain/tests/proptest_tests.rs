//! Property-based tests for the envelope and request ids
//!
//! These tests use proptest to verify invariants across many random inputs.

use domain::{Request, RequestId, Response};
use proptest::prelude::*;

// ============================================================================
// Envelope decoding
// ============================================================================

mod envelope_tests {
    use super::*;

    proptest! {
        #[test]
        fn decoding_arbitrary_bytes_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = Request::from_json(&bytes);
            let _ = Response::from_json(&bytes);
        }

        #[test]
        fn decoded_fields_match_the_wire(id in ".*", payload in ".*") {
            let wire = serde_json::json!({"requestId": id, "payload": payload}).to_string();

            let request = Request::from_json(wire.as_bytes()).unwrap();
            prop_assert_eq!(request.request_id.as_str(), id.as_str());
            prop_assert_eq!(request.payload, payload);
        }

        #[test]
        fn missing_payload_defaults_to_empty(id in "[a-z0-9-]{1,32}") {
            let wire = serde_json::json!({"requestId": id}).to_string();

            let request = Request::from_json(wire.as_bytes()).unwrap();
            prop_assert_eq!(request.request_id.as_str(), id.as_str());
            prop_assert!(request.payload.is_empty());
        }

        #[test]
        fn non_object_json_is_rejected(n in any::<i64>()) {
            prop_assert!(Request::from_json(n.to_string().as_bytes()).is_err());
        }
    }
}

// ============================================================================
// Minted request ids
// ============================================================================

mod request_id_tests {
    use super::*;

    proptest! {
        #[test]
        fn minted_ids_carry_transport_and_node(
            transport in "[a-z0-9]{1,8}",
            node in "[a-zA-Z0-9:._-]{1,32}"
        ) {
            let id = RequestId::mint(&transport, &node);
            let prefix = format!("in:{transport}-sid:{node}-");
            prop_assert!(id.as_str().starts_with(&prefix));
            prop_assert!(id.as_str().len() > prefix.len());
        }

        #[test]
        fn minted_ids_are_unique(node in "[a-z]{1,16}") {
            let first = RequestId::mint("http", &node);
            let second = RequestId::mint("http", &node);
            prop_assert_ne!(first, second);
        }
    }
}
