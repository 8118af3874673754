//! gRPC downstream client adapter
//!
//! Implements [`ClientPort`] with the unary `theFunction` call of the
//! envelope service.

use std::{sync::Arc, time::Duration};

use application::{ApplicationError, ClientPort};
use async_trait::async_trait;
use bb_proto::{TheRequest, TheServiceClient};
use domain::{Request, Response};
use tonic::transport::Channel;
use tracing::{debug, info, instrument};

use crate::{config::AppConfig, grpc::build_channel};

/// Client for one gRPC downstream node
#[derive(Debug, Clone)]
pub struct GrpcClientAdapter {
    id: String,
    client: TheServiceClient<Channel>,
}

impl GrpcClientAdapter {
    /// Create a client for `target` (`host:port`)
    ///
    /// With an `authority`, calls still go to `target` but carry that
    /// authority, and the client id becomes `{target} / {authority}`.
    pub fn new(
        target: &str,
        authority: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ApplicationError> {
        let channel = build_channel(target, authority, timeout)?;
        let id = authority.map_or_else(
            || target.to_string(),
            |authority| format!("{target} / {authority}"),
        );

        Ok(Self {
            id,
            client: TheServiceClient::new(channel),
        })
    }
}

#[async_trait]
impl ClientPort for GrpcClientAdapter {
    fn id(&self) -> String {
        self.id.clone()
    }

    #[instrument(skip(self, request), fields(client = %self.id, request_id = %request.request_id))]
    async fn send(&self, request: &Request) -> Result<Response, ApplicationError> {
        let mut client = self.client.clone();
        let reply = client
            .the_function(TheRequest::from(request))
            .await
            .map_err(|status| {
                ApplicationError::Transport(format!(
                    "grpc status {:?}: {}",
                    status.code(),
                    status.message()
                ))
            })?;

        debug!("Downstream responded");
        Ok(reply.into_inner().into())
    }

    async fn close(&self) -> Result<(), ApplicationError> {
        info!(client = %self.id, "Closing gRPC client");
        Ok(())
    }
}

/// Build one client per configured gRPC downstream
pub fn build_grpc_clients(config: &AppConfig) -> Result<Vec<Arc<dyn ClientPort>>, ApplicationError> {
    let downstream = &config.downstream;
    downstream.validate_grpc_authorities()?;

    downstream
        .grpc_servers
        .iter()
        .enumerate()
        .map(|(index, target)| -> Result<Arc<dyn ClientPort>, ApplicationError> {
            let client = GrpcClientAdapter::new(
                target,
                downstream.grpc_authority(index),
                config.service.downstream_timeout,
            )?;
            info!(client = %client.id, "gRPC downstream client created");
            Ok(Arc::new(client))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn id_is_the_target() {
        let client = GrpcClientAdapter::new("localhost:9090", None, Duration::from_secs(1)).unwrap();
        assert_eq!(client.id(), "localhost:9090");
    }

    #[tokio::test]
    async fn id_includes_authority_override() {
        let client =
            GrpcClientAdapter::new("proxy:4140", Some("leaf.internal"), Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.id(), "proxy:4140 / leaf.internal");
    }

    #[tokio::test]
    async fn builds_one_client_per_downstream() {
        let mut config = AppConfig::default();
        config.downstream.grpc_servers = vec!["a:1".to_string(), "b:2".to_string()];
        config.downstream.grpc_authorities = vec!["x".to_string(), String::new()];

        let clients = build_grpc_clients(&config).unwrap();
        let ids: Vec<String> = clients.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["a:1 / x", "b:2"]);
    }

    #[tokio::test]
    async fn unreachable_downstream_is_a_transport_error() {
        let client = GrpcClientAdapter::new("127.0.0.1:1", None, Duration::from_secs(2)).unwrap();
        let err = client.send(&Request::with_id("r")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Transport(_)));
    }
}
