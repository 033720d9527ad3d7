//! # Configuration Management
//!
//! Settings are read from environment variables prefixed with `SINKAUTH`,
//! using `__` to descend into nested sections:
//!
//! - `SINKAUTH_ENCRYPTION__PASSPHRASE`: shared secret-encryption passphrase
//! - `SINKAUTH_LOGGING__LEVEL`: default log filter (overridden by `RUST_LOG`)
//! - `SINKAUTH_LOGGING__JSON`: emit JSON log lines

pub mod settings;

pub use settings::{EncryptionSettings, LoggingConfig, Settings};

/// Prefix shared by every environment variable this crate reads
pub const ENV_PREFIX: &str = "SINKAUTH";
