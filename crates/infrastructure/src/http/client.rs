//! reqwest client construction and URL validation
//!
//! Every outbound call made by a node goes through a client built here, so
//! timeouts and the user agent are applied the same way everywhere.

use std::time::Duration;

use application::ApplicationError;
use reqwest::Client;
use url::Url;

/// Header carrying the envelope's request id on outbound calls
pub const X_REQUEST_ID: &str = "x-request-id";

/// Settings for an outbound HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientSettings {
    /// Whole-request deadline; zero means no deadline
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            user_agent: format!("bb/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientSettings {
    /// Settings with a custom deadline
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Build a reqwest client from the settings
pub fn build_client(settings: &HttpClientSettings) -> Result<Client, ApplicationError> {
    let mut builder = Client::builder().user_agent(&settings.user_agent);
    if !settings.timeout.is_zero() {
        builder = builder.timeout(settings.timeout);
    }

    builder
        .build()
        .map_err(|e| ApplicationError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Accept only absolute `http://` or `https://` URLs
pub fn parse_http_url(raw: &str) -> Result<Url, ApplicationError> {
    if raw.is_empty() {
        return Err(ApplicationError::Construction(
            "URL to invoke is empty".to_string(),
        ));
    }

    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ApplicationError::Construction(format!(
            "url must be HTTP or HTTPS, was [{raw}]"
        )));
    }

    Url::parse(raw).map_err(|e| {
        ApplicationError::Construction(format!("error while parsing URL [{raw}]: {e}"))
    })
}
