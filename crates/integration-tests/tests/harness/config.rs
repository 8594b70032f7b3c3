//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::time::Duration;

use glossa_config::{Config, ServerConfig, TranslateConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config pointed at a mock upstream
    pub fn new(upstream_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    ..ServerConfig::default()
                },
                translate: TranslateConfig {
                    api_key: Some(SecretString::from("test-google-key")),
                    base_url: upstream_url.parse().expect("valid URL"),
                    timeout: Duration::from_secs(5),
                    ..TranslateConfig::default()
                },
                ..Config::default()
            },
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.translate.timeout = timeout;
        self
    }

    pub fn with_master_key(mut self, key: &str) -> Self {
        self.config.server.auth.master_key = Some(SecretString::from(key));
        self
    }

    pub fn with_known_models(mut self, models: &[&str]) -> Self {
        self.config.translate.known_models = models.iter().map(|&m| m.to_owned()).collect();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
