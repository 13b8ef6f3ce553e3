pub mod rsa_sha256;

pub use rsa_sha256::RsaSha256;

use crate::error::Result;

/// Detached signature scheme over UTF-8 message text
pub trait SignatureScheme: Send + Sync {
    /// Algorithm identifier, for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Sign a message with a PEM private key, returning base64 signature text
    fn sign(&self, private_key: &str, message: &str) -> Result<String>;

    /// Verify base64 signature text against a message and PEM public key.
    ///
    /// `Ok(false)` means the signature does not match; `Err` is reserved for
    /// input that cannot be parsed at all.
    fn verify(&self, public_key: &str, message: &str, signature: &str) -> Result<bool>;
}

/// Sign `plaintext` with the default scheme
pub fn sign(private_key: &str, plaintext: &str) -> Result<String> {
    RsaSha256.sign(private_key, plaintext)
}

/// Verify a detached signature with the default scheme
pub fn verify(public_key: &str, plaintext: &str, signature: &str) -> Result<bool> {
    RsaSha256.verify(public_key, plaintext, signature)
}
