//! HTTP/1.1 downstream client adapter
//!
//! Implements [`ClientPort`] by POSTing the JSON envelope to a peer node and
//! decoding the JSON envelope it answers with.

use std::sync::Arc;

use application::{ApplicationError, ClientPort};
use async_trait::async_trait;
use domain::{Request, Response};
use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::{
    config::AppConfig,
    http::{HttpClientSettings, X_REQUEST_ID, build_client, parse_http_url},
};

/// Client for one HTTP/1.1 downstream node
#[derive(Debug, Clone)]
pub struct HttpClientAdapter {
    url: String,
    client: Client,
}

impl HttpClientAdapter {
    /// Create a client for `url` with the given settings
    pub fn new(url: impl Into<String>, settings: &HttpClientSettings) -> Result<Self, ApplicationError> {
        Self::with_client(url, build_client(settings)?)
    }

    /// Create a client for `url` over an existing connection pool
    pub fn with_client(url: impl Into<String>, client: Client) -> Result<Self, ApplicationError> {
        let url = url.into();
        parse_http_url(&url)?;
        Ok(Self { url, client })
    }

    /// The downstream URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ClientPort for HttpClientAdapter {
    fn id(&self) -> String {
        self.url.clone()
    }

    #[instrument(skip(self, request), fields(client = %self.url, request_id = %request.request_id))]
    async fn send(&self, request: &Request) -> Result<Response, ApplicationError> {
        let response = self
            .client
            .post(&self.url)
            .header(X_REQUEST_ID, request.request_id.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApplicationError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApplicationError::Transport(format!(
                "status {}: {}",
                status.as_u16(),
                String::from_utf8_lossy(&body)
            )));
        }

        let decoded = Response::from_json(&body).map_err(|e| {
            ApplicationError::Transport(format!(
                "{e}; body: {}",
                String::from_utf8_lossy(&body)
            ))
        })?;

        debug!(status = status.as_u16(), "Downstream responded");
        Ok(decoded)
    }

    async fn close(&self) -> Result<(), ApplicationError> {
        info!(client = %self.url, "Closing HTTP client");
        Ok(())
    }
}

/// Build one client per configured HTTP/1.1 downstream
///
/// All of them share a single connection pool.
pub fn build_http_clients(config: &AppConfig) -> Result<Vec<Arc<dyn ClientPort>>, ApplicationError> {
    if config.downstream.h1_servers.is_empty() {
        return Ok(Vec::new());
    }

    let pool = build_client(&HttpClientSettings::with_timeout(
        config.service.downstream_timeout,
    ))?;

    config
        .downstream
        .h1_servers
        .iter()
        .map(|url| -> Result<Arc<dyn ClientPort>, ApplicationError> {
            let client = HttpClientAdapter::with_client(url, pool.clone())?;
            info!(client = %url, "HTTP/1.1 downstream client created");
            Ok(Arc::new(client))
        })
        .collect()
}
