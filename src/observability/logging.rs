//! # Structured Logging
//!
//! Codec and scheme operations emit `debug` events carrying lengths and scheme
//! names only. Secret values, plaintext or encrypted, are never recorded.

use crate::config::LoggingConfig;
use crate::errors::{AuthError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Fails instead of panicking
/// when a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json { builder.json().try_init() } else { builder.try_init() };

    installed.map_err(|e| AuthError::config_with_source("Failed to install tracing subscriber", e))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            AuthError::config_with_source(format!("Invalid log level '{}'", config.level), Box::new(e))
        }),
    }
}
