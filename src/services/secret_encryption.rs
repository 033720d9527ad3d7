//! Secret encryption service using AES-256-GCM
//!
//! Sink credentials are encrypted before they reach the `metadata` column and
//! decrypted only right before an outbound request needs them.
//!
//! ## Key derivation
//!
//! The 256-bit key is the SHA-256 digest of a shared passphrase, so every
//! process configured with the same passphrase can read every stored secret.
//! The passphrase is loaded from `SINKAUTH_SECRET_PASSPHRASE`.
//!
//! ## Stored form
//!
//! Lowercase hex of `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! A fresh random nonce is drawn for every call, so encrypting the same value
//! twice yields two different strings.

use crate::config::ENV_PREFIX;
use crate::domain::SecretString;
use crate::errors::{AuthError, Result};
use ring::aead::{self, Aad, BoundKey, Nonce, NonceSequence, UnboundKey, AES_256_GCM};
use ring::digest::{digest, SHA256};
use ring::rand::SystemRandom;
use std::sync::Arc;
use tracing::{debug, instrument};
use zeroize::Zeroizing;

/// Size of AES-256-GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;

/// Size of AES-256-GCM tag in bytes
pub const TAG_SIZE: usize = 16;

const KEY_SIZE: usize = 32;

/// Source of nonce bytes.
///
/// Implementations are shared by every concurrent `encrypt` call and must be
/// safe to use from many threads at once.
pub trait NonceSource: Send + Sync {
    /// Fill `dest` entirely with unpredictable bytes
    fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), ring::error::Unspecified>;
}

impl NonceSource for SystemRandom {
    fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), ring::error::Unspecified> {
        ring::rand::SecureRandom::fill(self, dest)
    }
}

/// Configuration for the secret encryption service
#[derive(Debug, Clone)]
pub struct SecretEncryptionConfig {
    /// Shared passphrase the key is derived from
    pub passphrase: SecretString,
}

impl SecretEncryptionConfig {
    pub fn new(passphrase: impl Into<SecretString>) -> Self {
        Self { passphrase: passphrase.into() }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let var = format!("{}_SECRET_PASSPHRASE", ENV_PREFIX);
        let passphrase = std::env::var(&var).map_err(|_| {
            AuthError::config(format!("{} environment variable not set", var))
        })?;

        Ok(Self::new(passphrase))
    }

    /// Create a development/testing configuration with a fixed passphrase
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self::new("test")
    }
}

/// Single-use nonce sequence for AES-GCM
struct SingleNonce {
    nonce: Option<[u8; NONCE_SIZE]>,
}

impl SingleNonce {
    fn new(nonce_bytes: [u8; NONCE_SIZE]) -> Self {
        Self { nonce: Some(nonce_bytes) }
    }
}

impl NonceSequence for SingleNonce {
    fn advance(&mut self) -> std::result::Result<Nonce, ring::error::Unspecified> {
        self.nonce.take().map(Nonce::assume_unique_for_key).ok_or(ring::error::Unspecified)
    }
}

/// Secret encryption service.
///
/// Cheap to clone; clones share the derived key and nonce source. Holds no
/// per-call state, so one instance can serve any number of schemes and threads.
#[derive(Clone)]
pub struct SecretEncryption {
    key_bytes: Arc<Zeroizing<[u8; KEY_SIZE]>>,
    rng: Arc<dyn NonceSource>,
}

impl SecretEncryption {
    /// Create a new encryption service using the system CSPRNG for nonces
    pub fn new(config: &SecretEncryptionConfig) -> Result<Self> {
        Self::with_nonce_source(config, None)
    }

    /// Create a new encryption service with an explicit nonce source.
    ///
    /// `None` selects the system CSPRNG.
    pub fn with_nonce_source(
        config: &SecretEncryptionConfig,
        rng: Option<Arc<dyn NonceSource>>,
    ) -> Result<Self> {
        if config.passphrase.is_empty() {
            return Err(AuthError::config("secret encryption passphrase must not be empty"));
        }

        let mut key_array = Zeroizing::new([0u8; KEY_SIZE]);
        key_array.copy_from_slice(derive_key(config.passphrase.expose_secret()).as_ref());

        debug!("Secret encryption service initialized");

        Ok(Self {
            key_bytes: Arc::new(key_array),
            rng: rng.unwrap_or_else(|| Arc::new(SystemRandom::new()) as Arc<dyn NonceSource>),
        })
    }

    /// Shorthand for [`SecretEncryption::new`] from a bare passphrase
    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        Self::new(&SecretEncryptionConfig::new(passphrase))
    }

    /// Encrypt a secret into its hex stored form
    #[instrument(skip(self, plaintext), fields(plaintext_len = plaintext.len()))]
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|e| {
                AuthError::encryption_with_source("failed to generate random nonce", Box::new(e))
            })?;

        let unbound_key = UnboundKey::new(&AES_256_GCM, &self.key_bytes[..])
            .map_err(|_| AuthError::encryption("failed to create encryption key"))?;
        let mut sealing_key = aead::SealingKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        // nonce || ciphertext || tag
        let mut sealed = Vec::with_capacity(NONCE_SIZE + plaintext.len() + TAG_SIZE);
        sealed.extend_from_slice(&nonce_bytes);
        let mut in_out = plaintext.as_bytes().to_vec();
        sealing_key
            .seal_in_place_append_tag(Aad::empty(), &mut in_out)
            .map_err(|_| AuthError::encryption("failed to seal secret"))?;
        sealed.extend_from_slice(&in_out);

        let encoded = hex::encode(sealed);
        debug!(ciphertext_len = encoded.len(), "Successfully encrypted secret");

        Ok(encoded)
    }

    /// Decrypt a hex stored form back into the secret.
    ///
    /// Input that cannot be split into nonce and payload is reported as
    /// `MalformedCiphertext`; a payload whose tag does not verify under this
    /// key is reported as `AuthenticationFailure`.
    #[instrument(skip(self, ciphertext), fields(ciphertext_len = ciphertext.len()))]
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let sealed = hex::decode(ciphertext)
            .map_err(|e| AuthError::malformed(format!("invalid hex encoding: {}", e)))?;

        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(AuthError::malformed(format!(
                "expected at least {} bytes, got {}",
                NONCE_SIZE + TAG_SIZE,
                sealed.len()
            )));
        }

        let (nonce, payload) = sealed.split_at(NONCE_SIZE);
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        nonce_bytes.copy_from_slice(nonce);

        let unbound_key = UnboundKey::new(&AES_256_GCM, &self.key_bytes[..])
            .map_err(|_| AuthError::encryption("failed to create decryption key"))?;
        let mut opening_key = aead::OpeningKey::new(unbound_key, SingleNonce::new(nonce_bytes));

        let mut in_out = Zeroizing::new(payload.to_vec());
        let opened = opening_key
            .open_in_place(Aad::empty(), &mut in_out)
            .map_err(|_| AuthError::AuthenticationFailure)?;

        let plaintext = std::str::from_utf8(opened)
            .map_err(|_| AuthError::malformed("decrypted secret is not valid UTF-8"))?
            .to_string();

        debug!(plaintext_len = plaintext.len(), "Successfully decrypted secret");

        Ok(plaintext)
    }
}

fn derive_key(passphrase: &str) -> ring::digest::Digest {
    digest(&SHA256, passphrase.as_bytes())
}

impl std::fmt::Debug for SecretEncryption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretEncryption").field("key_bytes", &"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    /// Stored by an earlier deployment under passphrase "test"
    const STORED_ABCDEFG: &str =
        "dca8757dee5dfcc592c97355396dc2bdb95c6a3f58d4acb4453717c960827602acaf49";

    struct FixedNonce([u8; NONCE_SIZE]);

    impl NonceSource for FixedNonce {
        fn fill(&self, dest: &mut [u8]) -> std::result::Result<(), ring::error::Unspecified> {
            dest.copy_from_slice(&self.0[..dest.len()]);
            Ok(())
        }
    }

    struct BrokenRng;

    impl NonceSource for BrokenRng {
        fn fill(&self, _dest: &mut [u8]) -> std::result::Result<(), ring::error::Unspecified> {
            Err(ring::error::Unspecified)
        }
    }

    fn test_encryption() -> SecretEncryption {
        SecretEncryption::new(&SecretEncryptionConfig::for_testing()).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let encryption = test_encryption();

        let ciphertext = encryption.encrypt("my-secret-bearer-token").unwrap();

        assert_ne!(ciphertext, "my-secret-bearer-token");
        assert_eq!(ciphertext.len(), 2 * (NONCE_SIZE + "my-secret-bearer-token".len() + TAG_SIZE));
        assert!(ciphertext.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        assert_eq!(encryption.decrypt(&ciphertext).unwrap(), "my-secret-bearer-token");
    }

    #[test]
    fn test_decrypts_previously_stored_secret() {
        assert_eq!(test_encryption().decrypt(STORED_ABCDEFG).unwrap(), "abcdefg");
    }

    #[test]
    fn test_fixed_nonce_matches_reference_vector() {
        let encryption = SecretEncryption::with_nonce_source(
            &SecretEncryptionConfig::for_testing(),
            Some(Arc::new(FixedNonce([0u8; NONCE_SIZE]))),
        )
        .unwrap();

        assert_eq!(
            encryption.encrypt("abcdefg").unwrap(),
            "0000000000000000000000006b4d938838ce2a9455829234fcdc46c96f4683dacd269f"
        );
    }

    #[test]
    fn test_different_nonces_produce_different_ciphertext() {
        let encryption = test_encryption();

        let first = encryption.encrypt("same-plaintext").unwrap();
        let second = encryption.encrypt("same-plaintext").unwrap();

        assert_ne!(first[..2 * NONCE_SIZE], second[..2 * NONCE_SIZE]);
        assert_ne!(first, second);
        assert_eq!(encryption.decrypt(&first).unwrap(), "same-plaintext");
        assert_eq!(encryption.decrypt(&second).unwrap(), "same-plaintext");
    }

    #[test]
    fn test_same_passphrase_instances_interoperate() {
        let a = SecretEncryption::from_passphrase("shared").unwrap();
        let b = SecretEncryption::from_passphrase("shared").unwrap();

        let ciphertext = a.encrypt("token").unwrap();
        assert_eq!(b.decrypt(&ciphertext).unwrap(), "token");
    }

    #[test]
    fn test_wrong_passphrase_fails_authentication() {
        let other = SecretEncryption::from_passphrase("not-test").unwrap();

        let err = other.decrypt(STORED_ABCDEFG).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_tampered_ciphertext_fails_authentication() {
        let encryption = test_encryption();
        let mut bytes = hex::decode(encryption.encrypt("sensitive-data").unwrap()).unwrap();

        bytes[NONCE_SIZE] ^= 0xFF;

        let err = encryption.decrypt(&hex::encode(bytes)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_malformed_inputs() {
        let encryption = test_encryption();
        let too_short = "00".repeat(NONCE_SIZE + TAG_SIZE - 1);

        for input in ["not-hex-at-all", "abc", "", "00ff", too_short.as_str()] {
            let err = encryption.decrypt(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedCiphertext, "input {:?}", input);
        }
    }

    #[test]
    fn test_minimum_length_input_is_authenticated_not_malformed() {
        let err = test_encryption().decrypt(&"00".repeat(NONCE_SIZE + TAG_SIZE)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
    }

    #[test]
    fn test_empty_plaintext() {
        let encryption = test_encryption();

        let ciphertext = encryption.encrypt("").unwrap();
        assert_eq!(ciphertext.len(), 2 * (NONCE_SIZE + TAG_SIZE));
        assert_eq!(encryption.decrypt(&ciphertext).unwrap(), "");
    }

    #[test]
    fn test_rng_failure_is_encryption_failure() {
        let encryption = SecretEncryption::with_nonce_source(
            &SecretEncryptionConfig::for_testing(),
            Some(Arc::new(BrokenRng)),
        )
        .unwrap();

        let err = encryption.encrypt("abcdefg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncryptionFailure);
        assert!(err.is_retryable());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_empty_passphrase_rejected() {
        let err = SecretEncryption::from_passphrase("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_debug_hides_key() {
        let output = format!("{:?}", test_encryption());
        assert!(output.contains("[REDACTED]"));
    }

    #[test]
    fn test_concurrent_use() {
        let encryption = test_encryption();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let encryption = &encryption;
                scope.spawn(move || {
                    let secret = format!("token-{}", i);
                    let ciphertext = encryption.encrypt(&secret).unwrap();
                    assert_eq!(encryption.decrypt(&ciphertext).unwrap(), secret);
                });
            }
        });
    }
}
