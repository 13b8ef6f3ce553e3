//! Error types for the cryptography module

use thiserror::Error;

/// Result type alias for cryptographic operations
pub type Result<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during cryptographic operations
///
/// Each public operation maps its failures onto exactly one variant, so a
/// caller can pick user-facing wording from the variant alone.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Key generation was cancelled before a key pair was handed out
    #[error("Key generation cancelled")]
    GenerationCancelled,

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed.
    ///
    /// Carries no detail: a wrong key and a corrupted envelope are
    /// indistinguishable to the caller.
    #[error("Decryption failed")]
    Decryption,

    /// Signature generation failed
    #[error("Signature generation failed: {0}")]
    SignatureGeneration(String),

    /// Signature or key could not be parsed for verification
    #[error("Signature verification failed: {0}")]
    SignatureVerification(String),

    /// Invalid key format
    #[error("Invalid key format: {0}")]
    InvalidKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Envelope serialization failed
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::Serialization(err.to_string())
    }
}
