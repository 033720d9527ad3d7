//! Generic nested key-value structure used at the collaborator boundary.
//!
//! API payloads and `metadata` database columns both arrive as JSON objects.
//! [`Metadata`] wraps such an object; schemes convert it into their own typed
//! configuration and back, so nothing past the boundary works on raw maps.

use crate::errors::{AuthError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed mapping whose values may be strings, scalars or nested objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Convert an arbitrary JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AuthError::validation(format!(
                "metadata must be an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert a value, returning the previous one if present
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a string value; `None` when absent or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Get a nested object; `None` when absent or not an object
    pub fn get_object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.0.get(key).and_then(Value::as_object)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Metadata> for Value {
    fn from(metadata: Metadata) -> Self {
        Value::Object(metadata.0)
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Human-readable JSON type name for error messages
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_nests_metadata() {
        let metadata = Metadata::new()
            .with("authentication", Metadata::new().with("scheme", "Bearer").with("token", "abc"));

        let auth = metadata.get_object("authentication").unwrap();
        assert_eq!(auth.get("scheme").and_then(Value::as_str), Some("Bearer"));
        assert_eq!(metadata.len(), 1);
    }

    #[test]
    fn test_key_order_irrelevant() {
        let a = Metadata::new().with("scheme", "Bearer").with("token", "x");
        let b = Metadata::new().with("token", "x").with("scheme", "Bearer");
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_value_requires_object() {
        let metadata = Metadata::from_value(json!({"scheme": "Bearer"})).unwrap();
        assert_eq!(metadata.get_str("scheme"), Some("Bearer"));

        let err = Metadata::from_value(json!(["scheme"])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_get_str_ignores_non_strings() {
        let metadata = Metadata::new().with("port", 8080).with("name", "sink");
        assert_eq!(metadata.get_str("port"), None);
        assert_eq!(metadata.get_str("name"), Some("sink"));
        assert_eq!(metadata.get_str("missing"), None);
    }

    #[test]
    fn test_serde_is_transparent() {
        let metadata = Metadata::new().with("authentication", json!({"scheme": "Bearer"}));
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json, json!({"authentication": {"scheme": "Bearer"}}));

        let back: Metadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, metadata);
    }
}
