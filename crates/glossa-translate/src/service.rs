use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::{Stream, StreamExt, stream};
use glossa_config::TranslateConfig;

use crate::{
    adapter::{self, UpstreamPayload},
    error::Result,
    normalize,
    protocol::{ChatCompletionRequest, Model, ModelList},
    stream::{Frame, StreamFramer},
    upstream::{Upstream, UpstreamClient},
};

/// Request-scoped state produced before any byte of the stream is sent
#[derive(Debug)]
pub struct Translation {
    payload: UpstreamPayload,
    framer: StreamFramer,
}

impl Translation {
    pub const fn payload(&self) -> &UpstreamPayload {
        &self.payload
    }

    pub const fn framer(&self) -> &StreamFramer {
        &self.framer
    }
}

/// Chat-to-translation adapter
///
/// Holds the only cross-request state: the upstream handle, shared
/// read-only by concurrent requests and released when the last
/// reference drops.
pub struct TranslateService {
    upstream: Arc<dyn Upstream>,
    default_model: String,
    known_models: Vec<String>,
    owned_by: String,
}

impl TranslateService {
    /// Validate the request and build its upstream payload
    ///
    /// Fails with `InvalidRequest` before any streaming commitment.
    pub fn prepare(&self, request: ChatCompletionRequest) -> Result<Translation> {
        let payload = adapter::build_payload(&request)?;
        let model = request.model.filter(|m| !m.is_empty()).unwrap_or_else(|| self.default_model.clone());

        Ok(Translation {
            payload,
            framer: StreamFramer::new(model),
        })
    }

    /// Perform the upstream call and normalize its reply
    pub async fn translate(&self, payload: &UpstreamPayload) -> Result<String> {
        let body = self.upstream.translate(payload).await?;

        if let Some(language) = normalize::detected_language(&body) {
            tracing::debug!(detected_language = language, "upstream detected source language");
        }

        let fragment = normalize::extract_fragment(&body).inspect_err(|e| {
            tracing::error!(error = %e, "translation upstream broke the response contract");
        })?;

        Ok(normalize::normalize(fragment))
    }

    /// Run the translation and frame its outcome
    ///
    /// The stream is finite, yields at most three frames, and always ends
    /// with [`Frame::Done`]. Dropping it cancels the in-flight upstream call.
    pub fn stream(self: Arc<Self>, translation: Translation) -> impl Stream<Item = Frame> + Send + 'static {
        let Translation { payload, framer } = translation;

        stream::once(async move {
            let outcome = self.translate(&payload).await;

            match &outcome {
                Ok(text) => tracing::debug!(
                    request_id = framer.id(),
                    output_len = text.len(),
                    "translation complete"
                ),
                Err(e) => tracing::error!(
                    request_id = framer.id(),
                    source_lang = %payload.source_lang,
                    target_lang = %payload.target_lang,
                    text_len = payload.text.len(),
                    error = %e,
                    "translation failed, closing stream with an error chunk"
                ),
            }

            framer.frames(outcome)
        })
        .flat_map(stream::iter)
    }

    /// Static catalog of advertised models
    pub fn models(&self) -> ModelList {
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let data = self
            .known_models
            .iter()
            .map(|id| Model {
                id: id.clone(),
                object: "model".to_owned(),
                created,
                owned_by: self.owned_by.clone(),
            })
            .collect();

        ModelList {
            object: "list".to_owned(),
            data,
        }
    }
}

impl Drop for TranslateService {
    fn drop(&mut self) {
        tracing::debug!("releasing translation upstream client");
    }
}

/// Builder for constructing the translation service from configuration
pub struct TranslateServiceBuilder<'a> {
    config: &'a TranslateConfig,
    upstream: Option<Arc<dyn Upstream>>,
}

impl<'a> TranslateServiceBuilder<'a> {
    pub const fn new(config: &'a TranslateConfig) -> Self {
        Self { config, upstream: None }
    }

    /// Replace the HTTP client with another transport
    #[must_use]
    pub fn upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Fails closed when no transport is supplied and the API key is missing
    pub fn build(self) -> Result<TranslateService> {
        let upstream = match self.upstream {
            Some(upstream) => upstream,
            None => Arc::new(UpstreamClient::new(self.config)?),
        };

        let known_models = self.config.known_models().into_iter().map(str::to_owned).collect();

        tracing::debug!(
            endpoint = %self.config.base_url,
            timeout = ?self.config.timeout,
            "translation service initialized"
        );

        Ok(TranslateService {
            upstream,
            default_model: self.config.default_model.clone(),
            known_models,
            owned_by: self.config.owned_by.clone(),
        })
    }
}
