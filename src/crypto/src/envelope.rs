//! Encrypted message envelope
//!
//! `ciphertext` is base64 of `RSA-OAEP(aes_key) || AES-256-CBC(plaintext)`.
//! The first segment is exactly the recipient modulus size, which is how
//! the decryptor finds the split point without a length prefix.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One encrypted message: ciphertext, IV and an optional detached signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    #[serde(rename = "encryptedData", alias = "ciphertext")]
    ciphertext: String,
    iv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signature: Option<String>,
}

impl EncryptedEnvelope {
    /// Rebuild an envelope from its stored parts
    pub fn from_parts(ciphertext: String, iv: String, signature: Option<String>) -> Self {
        EncryptedEnvelope {
            ciphertext,
            iv,
            signature,
        }
    }

    /// Base64 of encrypted key followed by encrypted content
    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    /// Base64 AES-CBC initialization vector
    pub fn iv(&self) -> &str {
        &self.iv
    }

    /// Base64 detached signature over the plaintext, if the sender signed
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Copy of this envelope carrying `signature`
    pub fn with_signature(self, signature: String) -> Self {
        EncryptedEnvelope {
            signature: Some(signature),
            ..self
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
