//! # sinkauth
//!
//! Authentication configuration for telemetry sinks. Each sink carries an
//! authentication scheme (bearer token, basic auth) whose secret must be
//! validated on input, redacted for display and encrypted at rest.
//!
//! ## Architecture
//!
//! ```text
//! API payload / DB row ──► Metadata ──► AuthenticationScheme ──► Metadata
//!                                             │
//!                                             ▼
//!                                     SecretEncryption (AES-256-GCM)
//! ```
//!
//! Storage and transport stay with the caller: this crate receives plain
//! [`Metadata`] values and returns new ones.
//!
//! ## Core Components
//!
//! - **Secret codec**: [`SecretEncryption`], passphrase-derived authenticated encryption
//! - **Schemes**: [`auth::BearerTokenAuth`], [`auth::BasicAuth`]
//! - **Registry**: [`AuthenticationRegistry`], type name to scheme lookup

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod services;

// Re-export commonly used types and traits
pub use auth::{AuthenticationRegistry, AuthenticationScheme};
pub use crate::config::Settings;
pub use domain::{Format, Metadata, SecretString};
pub use errors::{AuthError, ErrorKind, Result};
pub use observability::init_logging;
pub use services::{SecretEncryption, SecretEncryptionConfig};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
