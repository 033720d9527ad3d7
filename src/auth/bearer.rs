//! Bearer-token authentication (`Authorization: <scheme> <token>`).

use super::scheme::{
    authentication_section, require_codec, require_header_safe, require_no_whitespace,
    require_non_empty, required_str, with_authentication_fields, AuthenticationScheme,
};
use crate::domain::{Format, Metadata, SecretString};
use crate::errors::Result;
use crate::services::SecretEncryption;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Registry name of the bearer-token scheme
pub const TYPE_NAME: &str = "bearerauth";

pub const SCHEME_FIELD: &str = "scheme";
pub const TOKEN_FIELD: &str = "token";

/// Typed view of a bearer-token configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerTokenConfig {
    /// Authorization scheme sent before the token, usually `Bearer`
    pub scheme: String,
    pub token: SecretString,
}

impl BearerTokenConfig {
    pub fn new(scheme: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self { scheme: scheme.into(), token: token.into() }
    }

    /// Read `scheme` and `token` from a flat field map
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        Ok(Self {
            scheme: required_str(fields, SCHEME_FIELD)?.to_string(),
            token: SecretString::new(required_str(fields, TOKEN_FIELD)?),
        })
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.scheme, SCHEME_FIELD)?;
        require_no_whitespace(&self.scheme, SCHEME_FIELD)?;
        require_header_safe(&self.scheme, SCHEME_FIELD)?;

        require_non_empty(self.token.expose_secret(), TOKEN_FIELD)?;
        require_no_whitespace(self.token.expose_secret(), TOKEN_FIELD)?;
        require_header_safe(self.token.expose_secret(), TOKEN_FIELD)?;
        Ok(())
    }
}

/// Bearer-token scheme.
///
/// Validation and redaction work without a codec; encode and decode need one.
#[derive(Debug, Clone, Default)]
pub struct BearerTokenAuth {
    encryption: Option<Arc<SecretEncryption>>,
}

impl BearerTokenAuth {
    pub fn new(encryption: Option<Arc<SecretEncryption>>) -> Self {
        Self { encryption }
    }

    pub fn with_encryption(encryption: Arc<SecretEncryption>) -> Self {
        Self::new(Some(encryption))
    }

    fn wrapped_config(input: &Metadata) -> Result<BearerTokenConfig> {
        BearerTokenConfig::from_fields(authentication_section(input)?)
    }
}

impl AuthenticationScheme for BearerTokenAuth {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn validate_configuration(&self, input_format: &str, input: &Metadata) -> Result<()> {
        Format::parse(input_format)?;
        BearerTokenConfig::from_fields(input.as_map())?.validate()
    }

    fn omit_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata> {
        Format::parse(output_format)?;
        Self::wrapped_config(input)?;
        with_authentication_fields(input, [(TOKEN_FIELD, String::new())])
    }

    #[instrument(skip_all, fields(scheme = TYPE_NAME))]
    fn encode_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata> {
        Format::parse(output_format)?;
        let codec = require_codec(&self.encryption, TYPE_NAME)?;
        let config = Self::wrapped_config(input)?;

        let encoded = codec
            .encrypt(config.token.expose_secret())
            .map_err(|e| e.with_context("authentication.token"))?;

        debug!("Encoded bearer token");
        with_authentication_fields(input, [(TOKEN_FIELD, encoded)])
    }

    #[instrument(skip_all, fields(scheme = TYPE_NAME))]
    fn decode_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata> {
        Format::parse(output_format)?;
        let codec = require_codec(&self.encryption, TYPE_NAME)?;
        let config = Self::wrapped_config(input)?;

        let decoded = codec
            .decrypt(config.token.expose_secret())
            .map_err(|e| e.with_context("authentication.token"))?;

        debug!("Decoded bearer token");
        with_authentication_fields(input, [(TOKEN_FIELD, decoded)])
    }

    fn authorization_header(
        &self,
        input_format: &str,
        decoded: &Metadata,
    ) -> Result<SecretString> {
        Format::parse(input_format)?;
        let config = Self::wrapped_config(decoded)?;
        config.validate()?;

        Ok(SecretString::new(format!("{} {}", config.scheme, config.token.expose_secret())))
    }
}
