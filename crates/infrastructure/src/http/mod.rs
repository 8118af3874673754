//! HTTP client utilities shared by the downstream adapters

mod client;

pub use client::{HttpClientSettings, X_REQUEST_ID, build_client, parse_http_url};
