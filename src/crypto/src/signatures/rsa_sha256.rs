use rsa::Pkcs1v15Sign;
use sha2::Sha256;
use tracing::debug;

use crate::encoding;
use crate::error::{CryptoError, Result};
use crate::hash::Sha256Hash;
use crate::keys::{parse_private_key, parse_public_key};
use crate::signatures::SignatureScheme;

/// RSASSA-PKCS1-v1_5 over a SHA-256 digest of the message
#[derive(Debug, Clone, Copy, Default)]
pub struct RsaSha256;

impl SignatureScheme for RsaSha256 {
    fn name(&self) -> &'static str {
        "RSASSA-PKCS1-v1_5-SHA256"
    }

    fn sign(&self, private_key: &str, message: &str) -> Result<String> {
        let key = parse_private_key(private_key)
            .map_err(|e| CryptoError::SignatureGeneration(e.to_string()))?;
        let digest = Sha256Hash::hash(message.as_bytes());

        let signature = key
            .sign(Pkcs1v15Sign::new::<Sha256>(), digest.as_bytes())
            .map_err(|e| CryptoError::SignatureGeneration(e.to_string()))?;

        Ok(encoding::encode(&signature))
    }

    fn verify(&self, public_key: &str, message: &str, signature: &str) -> Result<bool> {
        let key = parse_public_key(public_key)
            .map_err(|e| CryptoError::SignatureVerification(e.to_string()))?;
        let signature = encoding::decode(signature).map_err(|e| {
            CryptoError::SignatureVerification(format!("signature is not base64: {e}"))
        })?;
        let digest = Sha256Hash::hash(message.as_bytes());

        match key.verify(Pkcs1v15Sign::new::<Sha256>(), digest.as_bytes(), &signature) {
            Ok(()) => Ok(true),
            Err(err) => {
                debug!(scheme = self.name(), error = %err, "Signature mismatch");
                Ok(false)
            }
        }
    }
}
