//! gRPC channels to downstream nodes
//!
//! Channels connect lazily, so a node can start before its downstream
//! peers are listening.

use std::time::Duration;

use application::ApplicationError;
use tonic::transport::{Channel, Endpoint, Uri};

/// Accept only `host:port` targets
pub fn parse_grpc_target(target: &str) -> Result<Uri, ApplicationError> {
    if target.is_empty() {
        return Err(ApplicationError::Construction(
            "gRPC target is empty".to_string(),
        ));
    }

    if target.contains("://") || target.contains('/') {
        return Err(ApplicationError::Construction(format!(
            "gRPC target must be host:port, was [{target}]"
        )));
    }

    let uri: Uri = format!("http://{target}").parse().map_err(|e| {
        ApplicationError::Construction(format!("error while parsing gRPC target [{target}]: {e}"))
    })?;

    if uri.port_u16().is_none() {
        return Err(ApplicationError::Construction(format!(
            "gRPC target [{target}] has no port"
        )));
    }

    Ok(uri)
}

/// Lazily connecting channel to `target`
///
/// `authority` replaces the `:authority` sent on every call, for routing
/// through a proxy. A zero `timeout` means no deadline.
pub fn build_channel(
    target: &str,
    authority: Option<&str>,
    timeout: Duration,
) -> Result<Channel, ApplicationError> {
    let uri = parse_grpc_target(target)?;
    let mut endpoint = Endpoint::from(uri);

    if !timeout.is_zero() {
        endpoint = endpoint.connect_timeout(timeout).timeout(timeout);
    }

    if let Some(authority) = authority {
        let origin: Uri = format!("http://{authority}").parse().map_err(|e| {
            ApplicationError::Construction(format!(
                "error while parsing gRPC authority [{authority}]: {e}"
            ))
        })?;
        endpoint = endpoint.origin(origin);
    }

    Ok(endpoint.connect_lazy())
}
