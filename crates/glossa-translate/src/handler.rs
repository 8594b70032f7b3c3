//! Axum route handlers for the `OpenAI`-compatible surface

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::Sse;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use futures_util::StreamExt;

use crate::error::Result;
use crate::protocol::{ChatCompletionRequest, ModelList};
use crate::request::ExtractPayload;
use crate::service::TranslateService;

/// Create the endpoint router for translation
pub fn endpoint_router() -> Router<Arc<TranslateService>> {
    Router::new()
        .route("/v1/chat/completions", routing::post(chat_completions))
        .route("/v1/models", routing::get(list_models))
}

/// Handle `POST /v1/chat/completions`
///
/// Request errors are answered as plain JSON errors; once the request is
/// accepted the reply is always a well-formed event stream.
async fn chat_completions(
    State(service): State<Arc<TranslateService>>,
    ExtractPayload(request): ExtractPayload<ChatCompletionRequest>,
) -> Result<Response> {
    let translation = service.prepare(request)?;

    tracing::debug!(
        request_id = translation.framer().id(),
        model = translation.framer().model(),
        target_lang = %translation.payload().target_lang,
        "streaming translation"
    );

    let events = service
        .stream(translation)
        .map(|frame| Ok::<_, Infallible>(frame.into_event()));

    Ok(Sse::new(events).into_response())
}

/// Handle `GET /v1/models`
async fn list_models(State(service): State<Arc<TranslateService>>) -> Json<ModelList> {
    Json(service.models())
}
