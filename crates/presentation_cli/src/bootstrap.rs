//! Node assembly and lifecycle
//!
//! Servers start before the strategy exists because strategies validate
//! the topology they are given. If construction fails, the servers that
//! were already started are shut down again.

use std::sync::Arc;

use application::{
    ApplicationError, RequestHandler, ServerPort, Service, StopReason, StrategyKind,
};
use infrastructure::{AppConfig, build_clients, default_strategy_registry};
use presentation_grpc::GrpcServer;
use presentation_http::HttpServer;
use tokio::signal;
use tracing::{error, info, warn};

/// Start every transport and bind the strategy
pub async fn assemble(
    config: &AppConfig,
    strategy: StrategyKind,
) -> Result<Service, ApplicationError> {
    let handler = Arc::new(RequestHandler::new(Arc::new(config.service.clone())));

    let servers = match start_servers(config, &handler).await {
        Ok(servers) => servers,
        Err((started, e)) => {
            error!(error = %e, "Failed to start servers");
            stop_servers(&started).await;
            return Err(e);
        },
    };

    let assembled = build_clients(config).and_then(|clients| {
        Service::assemble(
            handler,
            servers.clone(),
            clients,
            &default_strategy_registry(),
            strategy.name(),
        )
    });

    match assembled {
        Ok(service) => Ok(service),
        Err(e) => {
            error!(strategy = %strategy, error = %e, "Failed to assemble node");
            stop_servers(&servers).await;
            Err(e)
        },
    }
}

/// gRPC listener first, then HTTP/1.1
///
/// On failure, returns the servers that did start so they can be stopped.
async fn start_servers(
    config: &AppConfig,
    handler: &Arc<RequestHandler>,
) -> Result<Vec<Arc<dyn ServerPort>>, (Vec<Arc<dyn ServerPort>>, ApplicationError)> {
    let mut servers: Vec<Arc<dyn ServerPort>> = Vec::new();

    if let Some(addr) = config.server.grpc_addr() {
        match GrpcServer::bind(&addr, Arc::clone(handler)).await {
            Ok(server) => servers.push(Arc::new(server)),
            Err(e) => return Err((servers, e)),
        }
    }

    if let Some(addr) = config.server.h1_addr() {
        match HttpServer::bind(&addr, Arc::clone(handler)).await {
            Ok(server) => servers.push(Arc::new(server)),
            Err(e) => return Err((servers, e)),
        }
    }

    Ok(servers)
}

/// Run until interrupted or the termination threshold fires, then shut down
pub async fn run(config: &AppConfig, strategy: StrategyKind) -> Result<StopReason, ApplicationError> {
    let service = assemble(config, strategy).await?;
    info!(
        node = %config.service.id,
        strategy = %strategy,
        grpc = ?config.server.grpc_addr(),
        h1 = ?config.server.h1_addr(),
        grpc_downstream = ?config.downstream.grpc_servers,
        h1_downstream = ?config.downstream.h1_servers,
        "Node started"
    );

    let reason = service.run_until(shutdown_signal()).await;
    info!(?reason, "Stopping node");

    service.shutdown().await?;
    info!("Node stopped");
    Ok(reason)
}

async fn stop_servers(servers: &[Arc<dyn ServerPort>]) {
    for server in servers {
        if let Err(e) = server.shutdown().await {
            warn!(server = %server.id(), error = %e, "Failed to shut down server");
        }
    }
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C");
        }
        () = terminate => {
            info!("Received SIGTERM");
        }
    }
}

#[cfg(test)]
mod tests {
    use application::strategies::RESPONSE_TEXT_ARG;

    use super::*;

    fn local_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.h1_port = Some(0);
        config.service.id = "test-node".to_string();
        config
    }

    #[tokio::test]
    async fn assembles_terminus_with_listener() {
        let mut config = local_config();
        config
            .service
            .extra_arguments
            .insert(RESPONSE_TEXT_ARG.to_string(), "BANANA".to_string());

        let service = assemble(&config, StrategyKind::Terminus).await.unwrap();
        assert_eq!(service.servers().len(), 1);
        assert!(service.clients().is_empty());
        assert!(service.handler().is_bound());

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn both_listeners_start_grpc_first() {
        let mut config = local_config();
        config.server.grpc_port = Some(0);

        let service = assemble(&config, StrategyKind::Terminus).await.unwrap();
        let ids: Vec<String> = service.servers().iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids[0].starts_with("grpc-"));
        assert!(ids[1].starts_with("h1-"));

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn grpc_and_h1_downstreams_feed_one_strategy() {
        let mut config = local_config();
        config.downstream.grpc_servers = vec!["127.0.0.1:1".to_string()];
        config.downstream.h1_servers = vec!["http://127.0.0.1:2".to_string()];

        let service = assemble(&config, StrategyKind::BroadcastChannel)
            .await
            .unwrap();
        let ids: Vec<String> = service.clients().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["127.0.0.1:1", "http://127.0.0.1:2"]);

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn terminus_without_listener_is_rejected() {
        let mut config = local_config();
        config.server.h1_port = None;

        let err = assemble(&config, StrategyKind::Terminus).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Construction(_)));
    }

    #[tokio::test]
    async fn channel_without_downstream_is_rejected() {
        let err = assemble(&local_config(), StrategyKind::PointToPointChannel)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Construction(_)));
    }

    #[tokio::test]
    async fn broadcast_with_downstream_assembles() {
        let mut config = local_config();
        config.downstream.h1_servers = vec![
            "http://127.0.0.1:1".to_string(),
            "http://127.0.0.1:2".to_string(),
        ];

        let service = assemble(&config, StrategyKind::BroadcastChannel)
            .await
            .unwrap();
        assert_eq!(service.clients().len(), 2);

        service.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn egress_parameters_are_validated() {
        let mut config = local_config();
        config
            .service
            .extra_arguments
            .insert("url".to_string(), "ftp://example.com".to_string());

        let err = assemble(&config, StrategyKind::HttpEgress).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Construction(_)));
    }
}
