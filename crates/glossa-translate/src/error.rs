use std::time::Duration;

use glossa_core::HttpError;
use http::StatusCode;
use thiserror::Error;

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;

/// Errors raised while adapting a chat request to the translation backend
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Required setting missing or unusable at initialization
    #[error("configuration error: {0}")]
    Config(String),

    /// Inbound request cannot be translated (no trailing user message, bad JSON)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream answered with a non-success status
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Upstream call exceeded its deadline
    #[error("upstream did not respond within {}s", .0.as_secs_f64())]
    UpstreamTimeout(Duration),

    /// Upstream reply does not have the documented nested-list shape
    #[error("unexpected upstream response shape: {body}")]
    UpstreamProtocol { body: String },

    /// Anything else that went wrong after the stream started
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HttpError for TranslateError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } | Self::UpstreamProtocol { .. } => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::Config(_) => "configuration_error",
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Upstream { .. } => "upstream_error",
            Self::UpstreamTimeout(_) => "upstream_timeout",
            Self::UpstreamProtocol { .. } => "upstream_protocol_error",
            Self::Internal(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Internal(_) => "an internal error occurred".to_owned(),
            other => other.to_string(),
        }
    }
}

impl axum::response::IntoResponse for TranslateError {
    fn into_response(self) -> axum::response::Response {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (self.status_code(), axum::Json(self.to_body())).into_response()
    }
}
