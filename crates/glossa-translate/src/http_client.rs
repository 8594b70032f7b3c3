use std::time::Duration;

use reqwest::Client;

use crate::error::{Result, TranslateError};

/// Build the pooled client owned by one translation service
///
/// `timeout` bounds each call from connect to the last body byte.
pub fn http_client(timeout: Duration) -> Result<Client> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
        .build()
        .map_err(|e| TranslateError::Config(format!("failed to build upstream HTTP client: {e}")))
}
