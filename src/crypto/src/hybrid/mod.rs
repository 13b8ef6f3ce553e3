use rsa::Oaep;
use sha1::Sha1;

pub mod decryption;
pub mod encryption;

pub use decryption::{HybridDecryptor, OpenedMessage, SignatureStatus};
pub use encryption::HybridEncryptor;

/// AES-256 key length in bytes
pub const AES_KEY_LEN: usize = 32;

/// AES-CBC initialization vector length in bytes
pub const IV_LEN: usize = 16;

/// OAEP padding for the AES key wrap
///
/// SHA-1 for both the label hash and MGF1, the `RSA-OAEP` defaults of
/// node-forge. Envelopes written by the web client unwrap here and the
/// other way round.
pub(crate) fn key_wrap_padding() -> Oaep {
    Oaep::new::<Sha1>()
}
