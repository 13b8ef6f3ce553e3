//! Error types for the vault module

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid contact: {0}")]
    InvalidContact(String),

    #[error("Key protection error: {0}")]
    KeyProtection(String),

    #[error("Wrong passphrase")]
    WrongPassphrase,

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<sled::Error> for VaultError {
    fn from(err: sled::Error) -> Self {
        VaultError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}
