#![allow(clippy::must_use_candidate)]

pub mod auth;
mod env;
pub mod health;
mod loader;
pub mod server;
pub mod telemetry;
pub mod translate;

use serde::Deserialize;

pub use auth::*;
pub use health::*;
pub use server::*;
pub use telemetry::*;
pub use translate::*;

/// Top-level Glossa configuration
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream translation backend configuration
    #[serde(default)]
    pub translate: TranslateConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}
