//! The capability set every authentication scheme implements.

use crate::domain::metadata::json_type_name;
use crate::domain::{Metadata, SecretString};
use crate::errors::{AuthError, Result};
use crate::services::SecretEncryption;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Key under which scheme fields are nested in the wrapped form
pub const AUTHENTICATION_KEY: &str = "authentication";

/// Key carrying the scheme type discriminator
pub const TYPE_KEY: &str = "type";

/// A pluggable authentication scheme for sink credentials.
///
/// Each operation takes a format discriminator first; only `"object"` is
/// currently accepted and anything else fails with `UnsupportedFormat`.
///
/// `validate_configuration` works on the flat form (`{scheme, token}`), the
/// other transforms on the wrapped form (`{authentication: {scheme, token}}`).
/// Transforms never mutate their input: they return a new [`Metadata`] where
/// only the secret field differs and every other key passes through.
pub trait AuthenticationScheme: Send + Sync + std::fmt::Debug {
    /// Registry name of this scheme, matched against the `type` discriminator
    fn type_name(&self) -> &'static str;

    /// Check that every required field is present and well-formed
    fn validate_configuration(&self, input_format: &str, input: &Metadata) -> Result<()>;

    /// Blank out the secret so the configuration can be shown to an operator
    fn omit_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata>;

    /// Replace the plaintext secret with its encrypted stored form
    fn encode_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata>;

    /// Replace the encrypted stored form with the plaintext secret
    fn decode_information(&self, output_format: &str, input: &Metadata) -> Result<Metadata>;

    /// Build the outbound `Authorization` header value from decoded metadata
    fn authorization_header(&self, input_format: &str, decoded: &Metadata)
        -> Result<SecretString>;
}

/// Borrow the nested `authentication` object of a wrapped-form value
pub fn authentication_section(input: &Metadata) -> Result<&Map<String, Value>> {
    match input.get(AUTHENTICATION_KEY) {
        Some(Value::Object(section)) => Ok(section),
        Some(other) => Err(AuthError::validation_field(
            format!("{} must be an object, got {}", AUTHENTICATION_KEY, json_type_name(other)),
            AUTHENTICATION_KEY,
        )),
        None => Err(AuthError::validation_field(
            format!("{} is required", AUTHENTICATION_KEY),
            AUTHENTICATION_KEY,
        )),
    }
}

/// Copy `input`, replacing the given fields inside its `authentication` object.
///
/// Keys not listed in `fields` are left exactly as they were.
pub fn with_authentication_fields(
    input: &Metadata,
    fields: impl IntoIterator<Item = (&'static str, String)>,
) -> Result<Metadata> {
    let mut section = authentication_section(input)?.clone();
    for (key, value) in fields {
        section.insert(key.to_string(), Value::String(value));
    }

    let mut output = input.clone();
    output.insert(AUTHENTICATION_KEY, Value::Object(section));
    Ok(output)
}

/// Read a field that must be present and hold a string
pub fn required_str<'a>(section: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    match section.get(field) {
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(AuthError::validation_field(
            format!("{} must be a string, got {}", field, json_type_name(other)),
            field,
        )),
        None => Err(AuthError::validation_field(format!("{} is required", field), field)),
    }
}

/// Reject empty values
pub fn require_non_empty(value: &str, field: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AuthError::validation_field(format!("{} must not be empty", field), field));
    }
    Ok(())
}

/// Reject characters that would break or inject into an HTTP header
pub fn require_header_safe(value: &str, field: &str) -> Result<()> {
    if value.chars().any(|c| c.is_control()) {
        return Err(AuthError::validation_field(
            format!("{} must not contain control characters", field),
            field,
        ));
    }
    Ok(())
}

/// Reject values containing any whitespace
pub fn require_no_whitespace(value: &str, field: &str) -> Result<()> {
    if value.chars().any(char::is_whitespace) {
        return Err(AuthError::validation_field(
            format!("{} must not contain whitespace", field),
            field,
        ));
    }
    Ok(())
}

/// Borrow the configured codec or fail with `CodecUnavailable`
pub fn require_codec<'a>(
    codec: &'a Option<Arc<SecretEncryption>>,
    scheme: &str,
) -> Result<&'a SecretEncryption> {
    codec.as_deref().ok_or_else(|| AuthError::codec_unavailable(scheme))
}
