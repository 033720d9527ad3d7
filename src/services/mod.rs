//! Services shared across authentication schemes.

pub mod secret_encryption;

pub use secret_encryption::{
    NonceSource, SecretEncryption, SecretEncryptionConfig, NONCE_SIZE, TAG_SIZE,
};
