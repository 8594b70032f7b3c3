use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream credential is missing or any
    /// setting is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_translate_config()?;
        self.validate_auth_config()?;
        Ok(())
    }

    fn validate_translate_config(&self) -> anyhow::Result<()> {
        let translate = &self.translate;

        match translate.api_key {
            Some(ref key) if !key.expose_secret().trim().is_empty() => {}
            _ => anyhow::bail!("translate.api_key is required"),
        }

        if translate.timeout.is_zero() {
            anyhow::bail!("translate.timeout must be greater than 0");
        }

        if translate.default_model.trim().is_empty() {
            anyhow::bail!("translate.default_model must not be empty");
        }

        if translate.known_models.iter().any(|model| model.trim().is_empty()) {
            anyhow::bail!("translate.known_models must not contain empty names");
        }

        Ok(())
    }

    fn validate_auth_config(&self) -> anyhow::Result<()> {
        if let Some(ref key) = self.server.auth.master_key
            && key.expose_secret().is_empty()
        {
            anyhow::bail!("server.auth.master_key must not be empty when set");
        }

        Ok(())
    }
}
