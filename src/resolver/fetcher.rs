//! HTTP fetcher implementation
//!
//! This module handles document retrieval for the resolver:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests for service pages
//! - Error classification into fetch (transport/status) and parse (content)
//!   failures

use crate::config::HttpConfig;
use crate::ResolveError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// The same client is shared by document fetches and video searches, so the
/// configured timeout bounds every outbound request.
///
/// # Example
///
/// ```no_run
/// use songbridge::config::HttpConfig;
/// use songbridge::resolver::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// | Condition                   | Result               |
/// |-----------------------------|----------------------|
/// | Transport error or timeout  | `ResolveError::Fetch`|
/// | Non-success status          | `ResolveError::Fetch`|
/// | `Content-Type` is not HTML  | `ResolveError::Parse`|
/// | Body can't be read          | `ResolveError::Fetch`|
///
/// A missing `Content-Type` header is accepted.
pub async fn fetch_document(client: &Client, url: &Url) -> Result<String, ResolveError> {
    tracing::debug!("Requesting HTML from {}", url);

    let fetch_error = |message: String| ResolveError::Fetch {
        url: url.to_string(),
        message,
    };

    let response = client.get(url.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            fetch_error("Request timeout".to_string())
        } else if e.is_connect() {
            fetch_error("Connection refused".to_string())
        } else {
            fetch_error(e.to_string())
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {}", status.as_u16())));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(content_type) = content_type {
        if !content_type.contains("html") {
            return Err(ResolveError::Parse {
                url: url.to_string(),
                message: format!("Expected HTML, got {}", content_type),
            });
        }
    }

    response.text().await.map_err(|e| fetch_error(e.to_string()))
}
