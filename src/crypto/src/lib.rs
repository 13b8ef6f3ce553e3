//! # SecureMail Cryptography Module
//!
//! End-to-end message protection for SecureMail.
//!
//! ## Features
//!
//! - **Key Management**: RSA-2048 key pairs in PEM form, generated off the async runtime with cancellation
//! - **Hybrid Encryption**: AES-256-CBC message body, RSA-OAEP (SHA-1) wrapped key
//! - **Signatures**: RSASSA-PKCS1-v1_5 over the SHA-256 digest of the plaintext
//! - **Fingerprints**: SHA-256 over the public key DER, for out-of-band comparison
//!
//! ## Module Structure
//!
//! ```text
//! crypto/
//! ├── keys/        - Key pair generation, PEM parsing, fingerprints
//! ├── hybrid/      - Envelope encryption and decryption
//! ├── signatures/  - Detached signatures
//! ├── envelope     - Serialized envelope format
//! ├── hash/        - SHA-256
//! └── encoding     - Base64 text encoding
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use securemail_crypto::{HybridDecryptor, HybridEncryptor, KeyPairGenerator};
//!
//! # fn main() -> securemail_crypto::Result<()> {
//! let alice = KeyPairGenerator::new().generate()?;
//! let bob = KeyPairGenerator::new().generate()?;
//!
//! let envelope = HybridEncryptor::encrypt_signed(bob.public_key(), alice.private_key(), "hi bob")?;
//! let opened = HybridDecryptor::decrypt_and_verify(bob.private_key(), Some(alice.public_key()), &envelope)?;
//!
//! assert_eq!(opened.plaintext, "hi bob");
//! assert!(opened.signature.is_verified());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod hybrid;
pub mod keys;
pub mod signatures;

pub use config::CryptoConfig;
pub use envelope::EncryptedEnvelope;
pub use error::{CryptoError, Result};
pub use hash::Sha256Hash;
pub use hybrid::{HybridDecryptor, HybridEncryptor, OpenedMessage, SignatureStatus};
pub use keys::{fingerprint, KeyFingerprint, KeyGenerationTask, KeyPair, KeyPairGenerator};
pub use signatures::{sign, verify, RsaSha256, SignatureScheme};
