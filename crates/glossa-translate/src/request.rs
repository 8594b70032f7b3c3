use axum::body::Body;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::TranslateError;

/// Extractor for JSON request bodies
///
/// Rejections use the same error envelope as every other failure, and
/// always happen before a stream is opened.
pub struct ExtractPayload<T>(pub T);

/// Body limit for chat requests (1 MiB)
const BODY_LIMIT_BYTES: usize = 1 << 20;

impl<S, T: DeserializeOwned> axum::extract::FromRequest<S> for ExtractPayload<T>
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        let is_json = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if !is_json {
            return Err((
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported Content-Type, expected: 'Content-Type: application/json'",
            )
                .into_response());
        }

        let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
            if std::error::Error::source(&err)
                .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
            {
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Request body is too large, limit is {BODY_LIMIT_BYTES} bytes"),
                )
                    .into_response()
            } else {
                TranslateError::InvalidRequest(format!("failed to read request body: {err}")).into_response()
            }
        })?;

        serde_json::from_slice::<T>(&bytes)
            .map(Self)
            .map_err(|e| TranslateError::InvalidRequest(format!("failed to parse request body: {e}")).into_response())
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRequest;

    use super::*;
    use crate::protocol::ChatCompletionRequest;

    fn request(content_type: Option<&str>, body: &'static str) -> http::Request<Body> {
        let mut builder = http::Request::builder().method("POST").uri("/v1/chat/completions");
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn accepts_json_with_charset() {
        let req = request(
            Some("application/json; charset=utf-8"),
            r#"{"messages":[{"role":"user","content":"hi"}]}"#,
        );

        let Ok(ExtractPayload(parsed)) = ExtractPayload::<ChatCompletionRequest>::from_request(req, &()).await else {
            panic!("valid body must be accepted");
        };

        assert_eq!(parsed.messages.len(), 1);
    }

    #[tokio::test]
    async fn rejects_missing_content_type() {
        let req = request(None, "{}");

        let Err(response) = ExtractPayload::<ChatCompletionRequest>::from_request(req, &()).await else {
            panic!("missing content type must be rejected");
        };

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn malformed_json_is_a_bad_request() {
        let req = request(Some("application/json"), "{not json");

        let Err(response) = ExtractPayload::<ChatCompletionRequest>::from_request(req, &()).await else {
            panic!("malformed body must be rejected");
        };

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
