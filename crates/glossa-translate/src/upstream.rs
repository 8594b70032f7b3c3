//! One-shot calls to the translation backend

use std::time::Duration;

use async_trait::async_trait;
use glossa_config::TranslateConfig;
use http::{HeaderMap, HeaderName, HeaderValue, header};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::adapter::UpstreamPayload;
use crate::error::{Result, TranslateError};
use crate::http_client::http_client;

/// Content type the backend requires for the nested-array payload
const PAYLOAD_CONTENT_TYPE: &str = "application/json+protobuf";

static API_KEY_HEADER: HeaderName = HeaderName::from_static("x-goog-api-key");

/// Transport to the translation backend
///
/// Implementations perform exactly one exchange per call and never retry.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Send `payload` and return the decoded JSON reply
    async fn translate(&self, payload: &UpstreamPayload) -> Result<serde_json::Value>;
}

/// HTTP client for the `translateHtml` endpoint
pub struct UpstreamClient {
    client: Client,
    endpoint: Url,
    headers: HeaderMap,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create the client from configuration
    ///
    /// Fails closed when the API key is missing or blank.
    pub fn new(config: &TranslateConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or_else(|| TranslateError::Config("translate.api_key is required".to_owned()))?;

        Ok(Self {
            client: http_client(config.timeout)?,
            endpoint: config.base_url.clone(),
            headers: upstream_headers(config, api_key)?,
            timeout: config.timeout,
        })
    }

    fn transport_error(&self, error: &reqwest::Error) -> TranslateError {
        if error.is_timeout() {
            tracing::warn!(timeout = ?self.timeout, "translation upstream timed out");
            TranslateError::UpstreamTimeout(self.timeout)
        } else {
            tracing::error!("translation upstream request failed: {error}");
            TranslateError::Internal(anyhow::anyhow!("failed to reach translation upstream: {error}"))
        }
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn translate(&self, payload: &UpstreamPayload) -> Result<serde_json::Value> {
        let body = serde_json::to_vec(payload).map_err(|e| TranslateError::Internal(e.into()))?;

        tracing::debug!(
            endpoint = %self.endpoint,
            source_lang = %payload.source_lang,
            target_lang = %payload.target_lang,
            text_len = payload.text.len(),
            "sending translation request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = response.status();
        tracing::debug!(%status, "translation upstream responded");

        let raw = response.text().await.map_err(|e| self.transport_error(&e))?;

        if !status.is_success() {
            tracing::error!(%status, body = %raw, "translation upstream returned an error");

            return Err(TranslateError::Upstream {
                status: status.as_u16(),
                body: raw,
            });
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(body = %raw, "translation upstream returned invalid JSON: {e}");
                Err(TranslateError::UpstreamProtocol { body: raw })
            }
        }
    }
}

/// Header profile the backend needs to accept a request
fn upstream_headers(config: &TranslateConfig, api_key: &SecretString) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(PAYLOAD_CONTENT_TYPE));
    headers.insert(header::ACCEPT_LANGUAGE, header_value("accept_language", &config.accept_language)?);
    headers.insert(header::ORIGIN, header_value("origin", &config.origin)?);
    headers.insert(header::REFERER, header_value("referer", &config.referer)?);
    headers.insert(header::USER_AGENT, header_value("user_agent", &config.user_agent)?);

    let mut key = header_value("api_key", api_key.expose_secret())?;
    key.set_sensitive(true);
    headers.insert(API_KEY_HEADER.clone(), key);

    Ok(headers)
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| TranslateError::Config(format!("translate.{field} is not a valid header value")))
}
