use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use glossa_core::HttpError;
use http::StatusCode;
use secrecy::{ExposeSecret, SecretString};

/// Rejection for requests without a valid master key
#[derive(Debug, thiserror::Error)]
#[error("invalid or missing API key")]
struct Unauthorized;

impl HttpError for Unauthorized {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_type(&self) -> &str {
        "authentication_error"
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}

impl IntoResponse for Unauthorized {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

/// Authenticate requests against the configured master key
///
/// Expects `Authorization: Bearer <key>`. The health path is always public.
pub async fn auth_middleware(
    master_key: SecretString,
    public_path: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    if public_path.as_deref() == Some(request.uri().path()) {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token {
        Some(token) if keys_match(token.trim(), master_key.expose_secret()) => next.run(request).await,
        Some(_) => {
            tracing::warn!(path = request.uri().path(), "rejected request with invalid API key");
            Unauthorized.into_response()
        }
        None => {
            tracing::debug!(path = request.uri().path(), "rejected request without API key");
            Unauthorized.into_response()
        }
    }
}

/// Compare without short-circuiting on the first differing byte
fn keys_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}
