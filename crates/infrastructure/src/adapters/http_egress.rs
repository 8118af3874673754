//! HTTP egress strategy - Calls a fixed external URL for every request
//!
//! Parameters come from the node's extra arguments:
//! - `url`: absolute `http://` or `https://` URL
//! - `method`: one of GET, POST, PUT, DELETE, PATCH
//! - `http-client-timeout`: human-readable duration, e.g. `10s`
//!
//! POST, PUT and PATCH send the request id as the body. The response body
//! becomes the payload.

use std::sync::Arc;

use application::{
    ApplicationError, ClientPort, ServerPort, ServiceConfig, StrategyKind, StrategyPort,
    strategies::topology_error,
};
use async_trait::async_trait;
use domain::{Request, Response};
use reqwest::{Client, Method};
use tracing::{info, instrument};

use crate::http::{HttpClientSettings, X_REQUEST_ID, build_client, parse_http_url};

/// Extra argument holding the URL to call
pub const URL_ARG: &str = "url";

/// Extra argument holding the HTTP method
pub const METHOD_ARG: &str = "method";

/// Extra argument holding the client timeout
pub const TIMEOUT_ARG: &str = "http-client-timeout";

const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
];

/// Strategy that turns each request into one outbound HTTP call
#[derive(Debug, Clone)]
pub struct HttpEgressStrategy {
    url: String,
    method: Method,
    client: Client,
}

impl HttpEgressStrategy {
    /// Requires at least one server, no clients and valid egress parameters
    pub fn build(
        config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Self, ApplicationError> {
        if servers.is_empty() || !clients.is_empty() {
            return Err(topology_error(
                StrategyKind::HttpEgress,
                "at least 1 server and no clients",
                servers,
                clients,
            ));
        }

        let url = config.extra_argument(URL_ARG).unwrap_or_default();
        parse_http_url(url)?;

        let raw_method = config.extra_argument(METHOD_ARG).unwrap_or_default();
        let method = SUPPORTED_METHODS
            .into_iter()
            .find(|m| m.as_str() == raw_method)
            .ok_or_else(|| {
                ApplicationError::Construction(format!(
                    "HTTP method [{raw_method}] isn't supported, use one of GET, POST, PUT, DELETE, PATCH"
                ))
            })?;

        let raw_timeout = config.extra_argument(TIMEOUT_ARG).unwrap_or_default();
        let timeout = humantime::parse_duration(raw_timeout).map_err(|e| {
            ApplicationError::Construction(format!(
                "error while parsing timeout [{raw_timeout}]: {e}"
            ))
        })?;

        let client = build_client(&HttpClientSettings::with_timeout(timeout))?;
        info!(url, method = %method, timeout = ?timeout, "HTTP egress configured");

        Ok(Self {
            url: url.to_string(),
            method,
            client,
        })
    }

    /// [`HttpEgressStrategy::build`], type-erased for the registry
    pub fn construct(
        config: &ServiceConfig,
        servers: &[Arc<dyn ServerPort>],
        clients: &[Arc<dyn ClientPort>],
    ) -> Result<Arc<dyn StrategyPort>, ApplicationError> {
        Ok(Arc::new(Self::build(config, servers, clients)?))
    }

    /// The URL being called
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The HTTP method in use
    pub fn method(&self) -> &Method {
        &self.method
    }

    fn sends_body(&self) -> bool {
        matches!(self.method, Method::POST | Method::PUT | Method::PATCH)
    }
}

#[async_trait]
impl StrategyPort for HttpEgressStrategy {
    #[instrument(skip(self, request), fields(url = %self.url, method = %self.method, request_id = %request.request_id))]
    async fn execute(&self, request: &Request) -> Result<Response, ApplicationError> {
        let mut outbound = self
            .client
            .request(self.method.clone(), &self.url)
            .header(X_REQUEST_ID, request.request_id.as_str());
        if self.sends_body() {
            outbound = outbound.body(request.request_id.to_string());
        }

        info!("Making egress request");
        let response = outbound
            .send()
            .await
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        let status = response.status();
        info!(status = status.as_u16(), "Egress response received");
        if !status.is_success() {
            return Err(ApplicationError::UnexpectedStatus {
                url: self.url.clone(),
                request_id: request.request_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        Ok(Response::new(request.request_id.clone(), body))
    }
}
