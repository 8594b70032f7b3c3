//! Chat-completion front for a translation backend
//!
//! Accepts `OpenAI`-style chat requests, translates the last user message
//! through the upstream `translateHtml` endpoint, and replies with a short
//! server-sent event stream in chat completion chunk format.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
mod error;
mod handler;
mod http_client;
pub mod normalize;
pub mod protocol;
mod request;
mod service;
pub mod stream;
pub mod upstream;

use std::sync::Arc;

pub use error::{Result, TranslateError};
pub use handler::endpoint_router;
pub use service::{TranslateService, TranslateServiceBuilder, Translation};
pub use stream::{Frame, StreamFramer};
pub use upstream::{Upstream, UpstreamClient};

/// Build the translation service from configuration
///
/// Fails closed when the upstream credential is missing.
pub fn build_service(config: &glossa_config::Config) -> anyhow::Result<Arc<TranslateService>> {
    let service = TranslateServiceBuilder::new(&config.translate)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize translation service: {e}"))?;

    Ok(Arc::new(service))
}
