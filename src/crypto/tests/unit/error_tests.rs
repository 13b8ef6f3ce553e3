//! Tests for CryptoError messages and conversions

use securemail_crypto::error::{CryptoError, Result};

#[cfg(test)]
mod error_message_tests {
    use super::*;

    #[test]
    fn test_key_generation_error() {
        let error = CryptoError::KeyGeneration("entropy source unavailable".to_string());
        assert_eq!(
            error.to_string(),
            "Key generation failed: entropy source unavailable"
        );
    }

    #[test]
    fn test_generation_cancelled() {
        assert_eq!(
            CryptoError::GenerationCancelled.to_string(),
            "Key generation cancelled"
        );
    }

    #[test]
    fn test_encryption_error() {
        let error = CryptoError::Encryption("public key: bad PEM".to_string());
        assert_eq!(error.to_string(), "Encryption failed: public key: bad PEM");
    }

    #[test]
    fn test_decryption_error_carries_no_detail() {
        assert_eq!(CryptoError::Decryption.to_string(), "Decryption failed");
    }

    #[test]
    fn test_signature_errors() {
        let error = CryptoError::SignatureGeneration("invalid key".to_string());
        assert_eq!(error.to_string(), "Signature generation failed: invalid key");

        let error = CryptoError::SignatureVerification("not base64".to_string());
        assert_eq!(error.to_string(), "Signature verification failed: not base64");
    }

    #[test]
    fn test_invalid_key_and_config() {
        let error = CryptoError::InvalidKey("malformed".to_string());
        assert_eq!(error.to_string(), "Invalid key format: malformed");

        let error = CryptoError::InvalidConfig("rsa_bits too small".to_string());
        assert_eq!(error.to_string(), "Invalid configuration: rsa_bits too small");
    }
}

#[cfg(test)]
mod error_conversion_tests {
    use super::*;
    use securemail_crypto::EncryptedEnvelope;

    #[test]
    fn test_serde_json_error_becomes_serialization() {
        let result: Result<EncryptedEnvelope> = EncryptedEnvelope::from_json("{not json");
        assert!(matches!(result, Err(CryptoError::Serialization(_))));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse_then_fail() -> Result<()> {
            EncryptedEnvelope::from_json("[]")?;
            Ok(())
        }

        assert!(matches!(parse_then_fail(), Err(CryptoError::Serialization(_))));
    }

    #[test]
    fn test_errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<CryptoError>();
    }
}
