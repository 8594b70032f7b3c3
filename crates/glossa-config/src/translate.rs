use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://translate-pa.googleapis.com/v1/translateHtml";
const DEFAULT_MODEL: &str = "google-translate";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36";

/// Upstream translation backend configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslateConfig {
    /// Credential sent as `x-goog-api-key`; required
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Translation endpoint
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// Deadline for a whole upstream call
    #[serde(default = "default_timeout", deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Model name echoed when the request does not carry one
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Models advertised by `/v1/models`
    #[serde(default)]
    pub known_models: Vec<String>,
    /// `owned_by` field of advertised models
    #[serde(default = "default_owned_by")]
    pub owned_by: String,
    /// `Origin` header expected by the upstream
    #[serde(default = "default_origin")]
    pub origin: String,
    /// `Referer` header expected by the upstream
    #[serde(default = "default_referer")]
    pub referer: String,
    /// Browser-like `User-Agent`
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// `Accept-Language` header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl TranslateConfig {
    /// Advertised models, falling back to the default model when none are listed
    pub fn known_models(&self) -> Vec<&str> {
        if self.known_models.is_empty() {
            vec![self.default_model.as_str()]
        } else {
            self.known_models.iter().map(String::as_str).collect()
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout: default_timeout(),
            default_model: default_model(),
            known_models: Vec::new(),
            owned_by: default_owned_by(),
            origin: default_origin(),
            referer: default_referer(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("valid default URL")
}

const fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_owned_by() -> String {
    "glossa".to_string()
}

fn default_origin() -> String {
    "https://stackoverflow.ai".to_string()
}

fn default_referer() -> String {
    "https://stackoverflow.ai/".to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_accept_language() -> String {
    "zh-CN,zh;q=0.9,en;q=0.8".to_string()
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn deserialize_minimal_config() {
        let toml = r#"
            api_key = "AIza-test"
        "#;

        let config: TranslateConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api_key.unwrap().expose_secret(), "AIza-test");
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.default_model, "google-translate");
        assert_eq!(config.origin, "https://stackoverflow.ai");
        assert_eq!(config.referer, "https://stackoverflow.ai/");
    }

    #[test]
    fn deserialize_human_timeout() {
        let toml = r#"
            api_key = "AIza-test"
            timeout = "1m30s"
        "#;

        let config: TranslateConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(90));
    }

    #[test]
    fn reject_garbage_timeout() {
        let toml = r#"
            timeout = "soon"
        "#;

        let err = toml::from_str::<TranslateConfig>(toml).unwrap_err();
        assert!(err.to_string().contains("invalid duration 'soon'"));
    }

    #[test]
    fn reject_unknown_fields() {
        let toml = r#"
            api_kee = "typo"
        "#;

        assert!(toml::from_str::<TranslateConfig>(toml).is_err());
    }

    #[test]
    fn known_models_fall_back_to_default() {
        let config = TranslateConfig {
            default_model: "gt-lite".to_string(),
            ..TranslateConfig::default()
        };
        assert_eq!(config.known_models(), vec!["gt-lite"]);

        let config = TranslateConfig {
            known_models: vec!["a".to_string(), "b".to_string()],
            ..TranslateConfig::default()
        };
        assert_eq!(config.known_models(), vec!["a", "b"]);
    }
}
