//! HTTP basic authentication (`Authorization: Basic base64(username:password)`).

use super::scheme::{
    authentication_section, require_codec, require_header_safe, require_non_empty, required_str,
    with_authentication_fields, AuthenticationScheme,
};
use crate::domain::{Format, Metadata, SecretString};
use crate::errors::{AuthError, Result};
use crate::services::SecretEncryption;
use base64::Engine;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Registry name of the basic-auth scheme
pub const TYPE_NAME: &str = "basicauth";

pub const USERNAME_FIELD: &str = "username";
pub const PASSWORD_FIELD: &str = "password";

/// Typed view of a basic-auth configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: SecretString,
}

impl BasicAuthConfig {
    pub fn new(username: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    /// Read `username` and `password` from a flat field map
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            username: required_str(fields, USERNAME_FIELD)?.to_string(),
            password: SecretString::new(required_str(fields, PASSWORD_FIELD)?),
        })
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.username, USERNAME_FIELD)?;
        require_header_safe(&self.username, USERNAME_FIELD)?;
        // RFC 7617: the user-id cannot contain a colon
        if self.username.contains(':') {
            return Err(AuthError::validation_field(
                format!("{} must not contain ':'", USERNAME_FIELD),
                USERNAME_FIELD,
            ));
        }

        require_non_empty(self.password.expose_secret(), PASSWORD_FIELD)?;
        require_header_safe(self.password.expose_secret(), PASSWORD_FIELD)?;
        Ok(())
    }
}

/// Username/password scheme; the password is the secret field.
#[derive(Debug, Clone, Default)]
pub struct BasicAuth {
    encryption: Option<Arc<SecretEncryption>>,
}

impl BasicAuth {
    pub fn new(encryption: Option<Arc<SecretEncryption>>) -> Self {
        Self { encryption }
    }

    pub fn with_encryption(encryption: Arc<SecretEncryption>) -> Self {
        Self::new(Some(encryption))
    }

    fn wrapped_config(input: &Metadata) -> Result<BasicAuthConfig> {
        BasicAuthConfig::from_fields(authentication_section(input)?)
    }
}

impl AuthenticationScheme for BasicAuth {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn validate_configuration(&self, input_format: &str, input: &Metadata) -> Result<()> {
        Format::parse(input_format)?;
        BasicAuthConfig::from_fields(input.as_map())?.validate()
    }

    fn omit_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata> {
        Format::parse(output_format)?;
        Self::wrapped_config(input)?;
        with_authentication_fields(input, [(PASSWORD_FIELD, String::new())])
    }

    #[instrument(skip_all, fields(scheme = TYPE_NAME))]
    fn encode_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata> {
        Format::parse(output_format)?;
        let codec = require_codec(&self.encryption, TYPE_NAME)?;
        let config = Self::wrapped_config(input)?;

        let encoded = codec
            .encrypt(config.password.expose_secret())
            .map_err(|e| e.with_context("authentication.password"))?;

        debug!("Encoded basic auth password");
        with_authentication_fields(input, [(PASSWORD_FIELD, encoded)])
    }

    #[instrument(skip_all, fields(scheme = TYPE_NAME))]
    fn decode_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata> {
        Format::parse(output_format)?;
        let codec = require_codec(&self.encryption, TYPE_NAME)?;
        let config = Self::wrapped_config(input)?;

        let decoded = codec
            .decrypt(config.password.expose_secret())
            .map_err(|e| e.with_context("authentication.password"))?;

        debug!("Decoded basic auth password");
        with_authentication_fields(input, [(PASSWORD_FIELD, decoded)])
    }

    fn authorization_header(
        &self,
        input_format: &str,
        decoded: &Metadata,
    ) -> Result<SecretString> {
        Format::parse(input_format)?;
        let config = Self::wrapped_config(decoded)?;
        config.validate()?;

        let credentials = zeroize::Zeroizing::new(format!(
            "{}:{}",
            config.username,
            config.password.expose_secret()
        ));
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        Ok(SecretString::new(format!("Basic {}", encoded)))
    }
}
