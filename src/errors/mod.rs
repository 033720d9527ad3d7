//! # Error Handling
//!
//! Error taxonomy for sink authentication configuration. Every failure is
//! returned to the caller classified; nothing in this crate retries, logs or
//! swallows an error.

use std::fmt;

/// Custom result type for sink authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Main error type for authentication configuration transforms
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// The format discriminator is not one this crate understands
    #[error("Unsupported format: '{format}'")]
    UnsupportedFormat { format: String },

    /// A required field is missing/empty or a scheme invariant is violated
    #[error("Validation error: {message}")]
    ValidationFailed { message: String, field: Option<String> },

    /// Encode/decode was attempted without a configured secret codec
    #[error("No secret codec configured for scheme '{scheme}'")]
    CodecUnavailable { scheme: String },

    /// The cipher could not produce a ciphertext
    #[error("Encryption failed: {message}")]
    EncryptionFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored secret cannot be parsed into nonce and payload
    #[error("Malformed ciphertext: {reason}")]
    MalformedCiphertext { reason: String },

    /// Stored secret parsed but its integrity tag did not verify
    #[error("Secret authentication failed: wrong passphrase or tampered data")]
    AuthenticationFailure,

    /// No scheme registered under the requested type name
    #[error("Unknown authentication type: '{name}'")]
    UnknownScheme { name: String },

    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Coarse classification of an [`AuthError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedFormat,
    ValidationFailed,
    CodecUnavailable,
    EncryptionFailure,
    MalformedCiphertext,
    AuthenticationFailure,
    UnknownScheme,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnsupportedFormat => write!(f, "unsupported_format"),
            ErrorKind::ValidationFailed => write!(f, "validation_failed"),
            ErrorKind::CodecUnavailable => write!(f, "codec_unavailable"),
            ErrorKind::EncryptionFailure => write!(f, "encryption_failure"),
            ErrorKind::MalformedCiphertext => write!(f, "malformed_ciphertext"),
            ErrorKind::AuthenticationFailure => write!(f, "authentication_failure"),
            ErrorKind::UnknownScheme => write!(f, "unknown_scheme"),
            ErrorKind::Config => write!(f, "config"),
        }
    }
}

impl AuthError {
    /// Create an unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat { format: format.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::ValidationFailed { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::ValidationFailed { message: message.into(), field: Some(field.into()) }
    }

    /// Create a codec unavailable error
    pub fn codec_unavailable<S: Into<String>>(scheme: S) -> Self {
        Self::CodecUnavailable { scheme: scheme.into() }
    }

    /// Create an encryption failure
    pub fn encryption<S: Into<String>>(message: S) -> Self {
        Self::EncryptionFailure { message: message.into(), source: None }
    }

    /// Create an encryption failure with source
    pub fn encryption_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::EncryptionFailure { message: message.into(), source: Some(source) }
    }

    /// Create a malformed ciphertext error
    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        Self::MalformedCiphertext { reason: reason.into() }
    }

    /// Create an unknown scheme error
    pub fn unknown_scheme<S: Into<String>>(name: S) -> Self {
        Self::UnknownScheme { name: name.into() }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            AuthError::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            AuthError::CodecUnavailable { .. } => ErrorKind::CodecUnavailable,
            AuthError::EncryptionFailure { .. } => ErrorKind::EncryptionFailure,
            AuthError::MalformedCiphertext { .. } => ErrorKind::MalformedCiphertext,
            AuthError::AuthenticationFailure => ErrorKind::AuthenticationFailure,
            AuthError::UnknownScheme { .. } => ErrorKind::UnknownScheme,
            AuthError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Prefix the message of a codec error with the location it came from.
    ///
    /// The classification is preserved so callers can still tell a wrong
    /// passphrase from corrupted input.
    pub fn with_context<C: fmt::Display>(self, context: C) -> Self {
        match self {
            AuthError::EncryptionFailure { message, source } => {
                AuthError::EncryptionFailure { message: format!("{}: {}", context, message), source }
            }
            AuthError::MalformedCiphertext { reason } => {
                AuthError::MalformedCiphertext { reason: format!("{}: {}", context, reason) }
            }
            other => other,
        }
    }

    /// Get the HTTP status code an API layer should return for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::UnsupportedFormat { .. } => 400,
            AuthError::ValidationFailed { .. } => 400,
            AuthError::UnknownScheme { .. } => 400,
            AuthError::MalformedCiphertext { .. } => 422,
            AuthError::AuthenticationFailure => 422,
            AuthError::CodecUnavailable { .. } => 500,
            AuthError::EncryptionFailure { .. } => 500,
            AuthError::Config { .. } => 500,
        }
    }

    /// Check if the caller may reasonably retry the operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::EncryptionFailure { .. })
    }
}

impl From<config::ConfigError> for AuthError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_with_source("Configuration loading failed", Box::new(error))
    }
}
