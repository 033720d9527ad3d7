//! Secrets must never reach the log stream, even at trace level.

use sinkauth::auth::{AuthenticationScheme, BearerTokenAuth};
use sinkauth::{Metadata, SecretEncryption};
use std::sync::Arc;
use tracing_test::traced_test;

#[traced_test]
#[test]
fn codec_logs_lengths_not_secrets() {
    let codec = SecretEncryption::from_passphrase("test").unwrap();

    let ciphertext = codec.encrypt("super-secret-token").unwrap();
    codec.decrypt(&ciphertext).unwrap();

    assert!(logs_contain("Successfully encrypted secret"));
    assert!(logs_contain("plaintext_len"));
    assert!(!logs_contain("super-secret-token"));
    assert!(!logs_contain(&ciphertext));
}

#[traced_test]
#[test]
fn scheme_transforms_log_scheme_name_only() {
    let auth =
        BearerTokenAuth::with_encryption(Arc::new(SecretEncryption::from_passphrase("test").unwrap()));
    let input = Metadata::new().with(
        "authentication",
        Metadata::new().with("scheme", "Bearer").with("token", "super-secret-token"),
    );

    let encoded = auth.encode_information("object", &input).unwrap();
    auth.decode_information("object", &encoded).unwrap();

    assert!(logs_contain("bearerauth"));
    assert!(!logs_contain("super-secret-token"));
}
