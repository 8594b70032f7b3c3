use secrecy::SecretString;
use serde::Deserialize;

/// Inbound authentication configuration
///
/// When `master_key` is set, every route except the health check requires
/// `Authorization: Bearer <master_key>`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Shared bearer token for API consumers
    #[serde(default)]
    pub master_key: Option<SecretString>,
}
