//! Representation discriminator accepted by every scheme operation.

use crate::errors::{AuthError, Result};
use std::fmt;
use std::str::FromStr;

/// Representation of the metadata a transform reads or produces.
///
/// Only in-memory structures are implemented. Serialized text forms would be
/// added as further variants without changing any scheme signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Operate on [`Metadata`](super::Metadata) values directly
    Object,
}

impl Format {
    /// Wire name of this format
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
        }
    }

    /// Parse a format discriminator, failing with `UnsupportedFormat`
    pub fn parse(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl FromStr for Format {
    type Err = AuthError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "object" => Ok(Self::Object),
            other => Err(AuthError::unsupported_format(other)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
