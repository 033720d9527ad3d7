//! # Configuration Settings

use super::ENV_PREFIX;
use crate::domain::SecretString;
use crate::errors::{AuthError, Result};
use crate::services::{SecretEncryption, SecretEncryptionConfig};
use serde::Deserialize;
use std::sync::Arc;

/// Top-level settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub encryption: EncryptionSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Secret encryption settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EncryptionSettings {
    /// Passphrase the codec key is derived from; empty disables encode/decode
    #[serde(default)]
    pub passphrase: SecretString,
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON instead of human-readable lines
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Values stay strings until deserialized so a passphrase like `007`
    /// is not reparsed as a number.
    pub fn from_env() -> Result<Self> {
        let source = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        Self::from_config(source)
    }

    /// Deserialize and validate settings from an already-built source
    pub fn from_config(source: config::Config) -> Result<Self> {
        let settings: Settings = source.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(AuthError::config("logging.level must not be empty"));
        }
        Ok(())
    }

    /// Build the shared codec, or `None` when no passphrase is configured.
    ///
    /// Without a codec, schemes can still validate and redact but not
    /// encode or decode.
    pub fn secret_encryption(&self) -> Result<Option<Arc<SecretEncryption>>> {
        if self.encryption.passphrase.is_empty() {
            return Ok(None);
        }

        let config = SecretEncryptionConfig { passphrase: self.encryption.passphrase.clone() };
        SecretEncryption::new(&config).map(|codec| Some(Arc::new(codec)))
    }
}
