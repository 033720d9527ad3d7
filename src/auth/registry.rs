//! Authentication scheme registry
//!
//! Maps the `type` discriminator carried in sink metadata to the scheme that
//! understands it. New schemes are added by registering another
//! [`AuthenticationScheme`] implementation; existing ones are untouched.

use super::basic::BasicAuth;
use super::bearer::BearerTokenAuth;
use super::scheme::{AuthenticationScheme, AUTHENTICATION_KEY, TYPE_KEY};
use crate::domain::Metadata;
use crate::errors::{AuthError, Result};
use crate::services::SecretEncryption;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of authentication schemes keyed by type name
#[derive(Default)]
pub struct AuthenticationRegistry {
    schemes: HashMap<String, Arc<dyn AuthenticationScheme>>,
}

impl std::fmt::Debug for AuthenticationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationRegistry")
            .field("schemes", &self.registered_types())
            .finish()
    }
}

impl AuthenticationRegistry {
    /// Create a new registry with no schemes
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in scheme sharing one codec
    pub fn with_defaults(encryption: Option<Arc<SecretEncryption>>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(BearerTokenAuth::new(encryption.clone())));
        registry.register(Arc::new(BasicAuth::new(encryption)));
        registry
    }

    /// Register a scheme, replacing any scheme with the same type name
    pub fn register(&mut self, scheme: Arc<dyn AuthenticationScheme>) {
        let type_name = scheme.type_name();
        debug!(type_name = %type_name, "Registering authentication scheme");
        self.schemes.insert(type_name.to_string(), scheme);
    }

    /// Look up a scheme by type name
    pub fn get(&self, type_name: &str) -> Result<Arc<dyn AuthenticationScheme>> {
        self.schemes.get(type_name).cloned().ok_or_else(|| AuthError::unknown_scheme(type_name))
    }

    pub fn has_scheme(&self, type_name: &str) -> bool {
        self.schemes.contains_key(type_name)
    }

    /// Registered type names, sorted
    pub fn registered_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.schemes.keys().cloned().collect();
        types.sort();
        types
    }

    /// Pick the scheme named by the `type` discriminator.
    ///
    /// The discriminator is read from `authentication.type` in the wrapped
    /// form, falling back to a top-level `type` for the flat form.
    pub fn resolve(&self, metadata: &Metadata) -> Result<Arc<dyn AuthenticationScheme>> {
        let nested = metadata.get_object(AUTHENTICATION_KEY).and_then(|section| section.get(TYPE_KEY));

        match nested.or_else(|| metadata.get(TYPE_KEY)) {
            Some(Value::String(type_name)) => self.get(type_name),
            Some(_) => Err(AuthError::validation_field(
                format!("{} must be a string", TYPE_KEY),
                TYPE_KEY,
            )),
            None => Err(AuthError::validation_field(
                format!("{} is required to select an authentication scheme", TYPE_KEY),
                TYPE_KEY,
            )),
        }
    }
}
