use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rsa::traits::PublicKeyParts;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::encoding;
use crate::envelope::EncryptedEnvelope;
use crate::error::{CryptoError, Result};
use crate::hybrid::{key_wrap_padding, AES_KEY_LEN, IV_LEN};
use crate::keys::parse_private_key;
use crate::signatures;

type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Outcome of checking the signature that travelled with an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignatureStatus {
    /// Signature matches the decrypted text under the sender's key
    Verified,
    /// Signature present but does not match, or could not be parsed
    Invalid,
    /// Sender did not sign
    Unsigned,
    /// Signature present but the sender's public key is unknown
    SenderKeyUnavailable,
}

impl SignatureStatus {
    pub fn is_verified(&self) -> bool {
        matches!(self, SignatureStatus::Verified)
    }
}

/// Decrypted message together with its signature outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedMessage {
    pub plaintext: String,
    pub signature: SignatureStatus,
}

/// Reverses [`HybridEncryptor`](crate::hybrid::HybridEncryptor)
pub struct HybridDecryptor;

impl HybridDecryptor {
    /// Decrypt an envelope with the recipient's own private key (PEM).
    ///
    /// Every failure is reported as the same [`CryptoError::Decryption`];
    /// the reason is only logged at debug level.
    pub fn decrypt(own_private_key: &str, envelope: &EncryptedEnvelope) -> Result<String> {
        open_envelope(own_private_key, envelope).map_err(|reason| {
            debug!(reason = %reason, "Envelope decryption failed");
            CryptoError::Decryption
        })
    }

    /// Decrypt, then check the envelope's signature against the sender's key.
    ///
    /// Signature problems never fail the call; they show up in
    /// [`OpenedMessage::signature`].
    pub fn decrypt_and_verify(
        own_private_key: &str,
        sender_public_key: Option<&str>,
        envelope: &EncryptedEnvelope,
    ) -> Result<OpenedMessage> {
        let plaintext = Self::decrypt(own_private_key, envelope)?;

        let signature = match (envelope.signature(), sender_public_key) {
            (None, _) => SignatureStatus::Unsigned,
            (Some(_), None) => SignatureStatus::SenderKeyUnavailable,
            (Some(signature), Some(sender_key)) => {
                match signatures::verify(sender_key, &plaintext, signature) {
                    Ok(true) => SignatureStatus::Verified,
                    Ok(false) => {
                        warn!("Signature does not match decrypted content");
                        SignatureStatus::Invalid
                    }
                    Err(err) => {
                        warn!(error = %err, "Signature could not be checked");
                        SignatureStatus::Invalid
                    }
                }
            }
        };

        Ok(OpenedMessage {
            plaintext,
            signature,
        })
    }
}

fn open_envelope(own_private_key: &str, envelope: &EncryptedEnvelope) -> std::result::Result<String, String> {
    let private_key = parse_private_key(own_private_key).map_err(|e| e.to_string())?;

    let combined =
        encoding::decode(envelope.ciphertext()).map_err(|e| format!("ciphertext encoding: {e}"))?;
    let iv = encoding::decode(envelope.iv()).map_err(|e| format!("iv encoding: {e}"))?;
    if iv.len() != IV_LEN {
        return Err(format!("iv is {} bytes", iv.len()));
    }

    let split = private_key.size();
    if combined.len() < split {
        return Err(format!(
            "ciphertext is {} bytes, shorter than the {split}-byte key segment",
            combined.len()
        ));
    }
    let (encrypted_key, encrypted_content) = combined.split_at(split);

    let aes_key = Zeroizing::new(
        private_key
            .decrypt_blinded(&mut OsRng, key_wrap_padding(), encrypted_key)
            .map_err(|e| format!("key unwrap: {e}"))?,
    );
    if aes_key.len() != AES_KEY_LEN {
        return Err(format!("unwrapped key is {} bytes", aes_key.len()));
    }

    let plaintext = Aes256CbcDec::new_from_slices(&aes_key, &iv)
        .map_err(|e| format!("cipher setup: {e}"))?
        .decrypt_padded_vec_mut::<Pkcs7>(encrypted_content)
        .map_err(|e| format!("content: {e}"))?;

    String::from_utf8(plaintext).map_err(|e| format!("plaintext is not UTF-8: {}", e.utf8_error()))
}
