//! Authentication schemes for sink credentials.
//!
//! Every scheme implements [`AuthenticationScheme`]:
//!
//! - **validate_configuration**: check caller-supplied fields
//! - **omit_information**: blank the secret for display
//! - **encode_information**: encrypt the secret before it is persisted
//! - **decode_information**: decrypt the secret right before it is used
//!
//! Plaintext secrets therefore only exist in memory at the moment an outbound
//! request is authenticated; storage holds ciphertext and API responses hold
//! nothing.
//!
//! ```rust
//! use sinkauth::auth::{AuthenticationRegistry, AuthenticationScheme};
//! use sinkauth::{Metadata, SecretEncryption};
//! use std::sync::Arc;
//!
//! let codec = Arc::new(SecretEncryption::from_passphrase("change-me")?);
//! let registry = AuthenticationRegistry::with_defaults(Some(codec));
//!
//! let config = Metadata::new().with(
//!     "authentication",
//!     Metadata::new().with("type", "bearerauth").with("scheme", "Bearer").with("token", "abc"),
//! );
//!
//! let scheme = registry.resolve(&config)?;
//! let stored = scheme.encode_information("object", &config)?;
//! let shown = scheme.omit_information("object", &stored)?;
//! let usable = scheme.decode_information("object", &stored)?;
//! assert_eq!(usable, config);
//! # let _ = shown;
//! # Ok::<(), sinkauth::AuthError>(())
//! ```

pub mod basic;
pub mod bearer;
pub mod registry;
pub mod scheme;

pub use basic::{BasicAuth, BasicAuthConfig};
pub use bearer::{BearerTokenAuth, BearerTokenConfig};
pub use registry::AuthenticationRegistry;
pub use scheme::{AuthenticationScheme, AUTHENTICATION_KEY, TYPE_KEY};
