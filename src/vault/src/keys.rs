//! Key store contract: the user's own identity and contacts' public keys
//!
//! Keys are opaque text to the store. Parsing and checking PEM belongs to
//! the caller.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{Result, VaultError};

/// The local user's email address and key pair
///
/// `private_key` is either PEM or a serialized
/// [`ProtectedPrivateKey`](crate::protection::ProtectedPrivateKey).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnIdentity {
    email: String,
    public_key: String,
    private_key: String,
}

impl OwnIdentity {
    pub fn new(email: &str, public_key: &str, private_key: &str) -> Result<Self> {
        let email = normalize_email(email)?;
        if public_key.trim().is_empty() {
            return Err(VaultError::InvalidContact("public key is empty".to_string()));
        }
        if private_key.trim().is_empty() {
            return Err(VaultError::InvalidContact("private key is empty".to_string()));
        }

        Ok(Self {
            email,
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl Drop for OwnIdentity {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for OwnIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnIdentity")
            .field("email", &self.email)
            .field("public_key_len", &self.public_key.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// A correspondent's email address and public key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub email: String,
    pub public_key: String,
}

/// Trim an email address and require the `@` separator
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(VaultError::InvalidContact(format!(
            "invalid email address: {email:?}"
        )));
    }
    Ok(email.to_string())
}

/// Storage for the local identity and the contact directory
pub trait KeyStore: Send + Sync {
    /// The stored identity, if set up
    fn own_identity(&self) -> Result<Option<OwnIdentity>>;

    /// Store the identity, replacing any previous one
    fn put_own_identity(&self, identity: &OwnIdentity) -> Result<()>;

    /// Public key for `email`, if it is a known contact
    fn contact_public_key(&self, email: &str) -> Result<Option<String>>;

    /// Insert or replace a contact's public key
    fn put_contact_public_key(&self, email: &str, public_key: &str) -> Result<()>;

    /// All contacts, ordered by email
    fn contacts(&self) -> Result<Vec<Contact>>;

    /// Forget the local identity. Contacts are kept.
    fn clear_own_keys(&self) -> Result<()>;

    fn has_own_keys(&self) -> Result<bool> {
        Ok(self.own_identity()?.is_some())
    }
}

impl<T: KeyStore + ?Sized> KeyStore for Arc<T> {
    fn own_identity(&self) -> Result<Option<OwnIdentity>> {
        (**self).own_identity()
    }

    fn put_own_identity(&self, identity: &OwnIdentity) -> Result<()> {
        (**self).put_own_identity(identity)
    }

    fn contact_public_key(&self, email: &str) -> Result<Option<String>> {
        (**self).contact_public_key(email)
    }

    fn put_contact_public_key(&self, email: &str, public_key: &str) -> Result<()> {
        (**self).put_contact_public_key(email, public_key)
    }

    fn contacts(&self) -> Result<Vec<Contact>> {
        (**self).contacts()
    }

    fn clear_own_keys(&self) -> Result<()> {
        (**self).clear_own_keys()
    }

    fn has_own_keys(&self) -> Result<bool> {
        (**self).has_own_keys()
    }
}

/// Validate a contact entry before it reaches a backend
pub(crate) fn validate_contact(email: &str, public_key: &str) -> Result<String> {
    let email = normalize_email(email)?;
    if public_key.trim().is_empty() {
        return Err(VaultError::InvalidContact(format!(
            "public key for {email} is empty"
        )));
    }
    Ok(email)
}
