use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use rsa::traits::PublicKeyParts;
use tracing::debug;
use zeroize::Zeroizing;

use crate::encoding;
use crate::envelope::EncryptedEnvelope;
use crate::error::{CryptoError, Result};
use crate::hybrid::{key_wrap_padding, AES_KEY_LEN, IV_LEN};
use crate::keys::parse_public_key;
use crate::signatures;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Hybrid encryption: AES-256-CBC for the message, RSA-OAEP for the AES key
pub struct HybridEncryptor;

impl HybridEncryptor {
    /// Encrypt `plaintext` for the holder of `recipient_public_key` (PEM).
    ///
    /// A fresh AES key and IV are drawn for every call.
    pub fn encrypt(recipient_public_key: &str, plaintext: &str) -> Result<EncryptedEnvelope> {
        let public_key = parse_public_key(recipient_public_key)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        let mut aes_key = Zeroizing::new([0u8; AES_KEY_LEN]);
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut aes_key[..]);
        OsRng.fill_bytes(&mut iv);

        let encrypted_content = Aes256CbcEnc::new_from_slices(&aes_key[..], &iv)
            .map_err(|e| CryptoError::Encryption(format!("cipher setup: {e}")))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let encrypted_key = public_key
            .encrypt(&mut OsRng, key_wrap_padding(), &aes_key[..])
            .map_err(|e| CryptoError::Encryption(format!("key wrap: {e}")))?;

        // Fixed-offset framing depends on this.
        if encrypted_key.len() != public_key.size() {
            return Err(CryptoError::Encryption(format!(
                "wrapped key is {} bytes, modulus is {}",
                encrypted_key.len(),
                public_key.size()
            )));
        }

        let mut combined = Vec::with_capacity(encrypted_key.len() + encrypted_content.len());
        combined.extend_from_slice(&encrypted_key);
        combined.extend_from_slice(&encrypted_content);

        debug!(
            modulus_bytes = public_key.size(),
            content_bytes = encrypted_content.len(),
            "Message encrypted"
        );

        Ok(EncryptedEnvelope::from_parts(
            encoding::encode(&combined),
            encoding::encode(&iv),
            None,
        ))
    }

    /// Sign `plaintext` with the sender's private key, then encrypt it for the recipient.
    ///
    /// The signature covers the plaintext, not the ciphertext.
    pub fn encrypt_signed(
        recipient_public_key: &str,
        sender_private_key: &str,
        plaintext: &str,
    ) -> Result<EncryptedEnvelope> {
        let signature = signatures::sign(sender_private_key, plaintext)?;
        let envelope = Self::encrypt(recipient_public_key, plaintext)?;
        Ok(envelope.with_signature(signature))
    }
}
