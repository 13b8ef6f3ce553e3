//! Tests for hybrid envelope encryption and decryption

use securemail_crypto::encoding;
use securemail_crypto::error::CryptoError;
use securemail_crypto::hybrid::{HybridDecryptor, HybridEncryptor, SignatureStatus};
use securemail_crypto::EncryptedEnvelope;

use crate::fixtures::{alice, bob};

#[cfg(test)]
mod encryption_tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let envelope = HybridEncryptor::encrypt(bob().public_key(), "hello").unwrap();
        assert_eq!(HybridDecryptor::decrypt(bob().private_key(), &envelope).unwrap(), "hello");
    }

    #[test]
    fn test_large_message_round_trip() {
        let body = "Lorem ipsum dolor sit amet. ".repeat(4096);
        let envelope = HybridEncryptor::encrypt(bob().public_key(), &body).unwrap();

        assert_eq!(HybridDecryptor::decrypt(bob().private_key(), &envelope).unwrap(), body);
    }

    #[test]
    fn test_same_plaintext_different_envelopes() {
        let first = HybridEncryptor::encrypt(bob().public_key(), "same").unwrap();
        let second = HybridEncryptor::encrypt(bob().public_key(), "same").unwrap();

        assert_ne!(first.ciphertext(), second.ciphertext());
        assert_ne!(first.iv(), second.iv());
    }

    #[test]
    fn test_ciphertext_length_tracks_padding() {
        for (len, content_len) in [(0usize, 16usize), (15, 16), (16, 32), (17, 32)] {
            let plaintext = "x".repeat(len);
            let envelope = HybridEncryptor::encrypt(bob().public_key(), &plaintext).unwrap();
            let raw = encoding::decode(envelope.ciphertext()).unwrap();

            assert_eq!(raw.len(), 256 + content_len, "plaintext length {len}");
            assert_eq!(encoding::decode(envelope.iv()).unwrap().len(), 16);
        }
    }

    #[test]
    fn test_unparseable_recipient_key() {
        assert!(matches!(
            HybridEncryptor::encrypt("", "hello"),
            Err(CryptoError::Encryption(_))
        ));
    }

    #[test]
    fn test_encrypt_is_unsigned() {
        let envelope = HybridEncryptor::encrypt(bob().public_key(), "hello").unwrap();
        assert!(!envelope.is_signed());
    }
}

#[cfg(test)]
mod decryption_failure_tests {
    use super::*;

    #[test]
    fn test_wrong_recipient() {
        let envelope = HybridEncryptor::encrypt(bob().public_key(), "for bob").unwrap();
        assert!(matches!(
            HybridDecryptor::decrypt(alice().private_key(), &envelope),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn test_flipped_key_segment_byte() {
        let envelope = HybridEncryptor::encrypt(bob().public_key(), "hello").unwrap();
        let mut raw = encoding::decode(envelope.ciphertext()).unwrap();
        raw[10] ^= 0x01;

        let tampered =
            EncryptedEnvelope::from_parts(encoding::encode(&raw), envelope.iv().to_string(), None);
        assert!(matches!(
            HybridDecryptor::decrypt(bob().private_key(), &tampered),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn test_truncated_content_segment() {
        let envelope = HybridEncryptor::encrypt(bob().public_key(), "hello").unwrap();
        let raw = encoding::decode(envelope.ciphertext()).unwrap();

        // Content no longer a whole number of blocks.
        let tampered = EncryptedEnvelope::from_parts(
            encoding::encode(&raw[..raw.len() - 3]),
            envelope.iv().to_string(),
            None,
        );
        assert!(HybridDecryptor::decrypt(bob().private_key(), &tampered).is_err());
    }

    #[test]
    fn test_key_segment_only() {
        let envelope = HybridEncryptor::encrypt(bob().public_key(), "hello").unwrap();
        let raw = encoding::decode(envelope.ciphertext()).unwrap();

        let tampered = EncryptedEnvelope::from_parts(
            encoding::encode(&raw[..256]),
            envelope.iv().to_string(),
            None,
        );
        assert!(HybridDecryptor::decrypt(bob().private_key(), &tampered).is_err());
    }

    #[test]
    fn test_empty_fields() {
        let envelope = EncryptedEnvelope::from_parts(String::new(), String::new(), None);
        assert!(matches!(
            HybridDecryptor::decrypt(bob().private_key(), &envelope),
            Err(CryptoError::Decryption)
        ));
    }
}

#[cfg(test)]
mod signed_envelope_tests {
    use super::*;

    #[test]
    fn test_signed_round_trip_verifies() {
        let envelope =
            HybridEncryptor::encrypt_signed(bob().public_key(), alice().private_key(), "hi bob")
                .unwrap();
        assert!(envelope.is_signed());

        let opened =
            HybridDecryptor::decrypt_and_verify(bob().private_key(), Some(alice().public_key()), &envelope)
                .unwrap();
        assert_eq!(opened.plaintext, "hi bob");
        assert_eq!(opened.signature, SignatureStatus::Verified);
    }

    #[test]
    fn test_signature_swapped_from_other_message_is_invalid() {
        let first =
            HybridEncryptor::encrypt_signed(bob().public_key(), alice().private_key(), "first")
                .unwrap();
        let second = HybridEncryptor::encrypt(bob().public_key(), "second")
            .unwrap()
            .with_signature(first.signature().unwrap().to_string());

        let opened =
            HybridDecryptor::decrypt_and_verify(bob().private_key(), Some(alice().public_key()), &second)
                .unwrap();
        assert_eq!(opened.plaintext, "second");
        assert_eq!(opened.signature, SignatureStatus::Invalid);
    }

    #[test]
    fn test_decrypt_ignores_signature() {
        let envelope =
            HybridEncryptor::encrypt_signed(bob().public_key(), alice().private_key(), "hi")
                .unwrap();
        assert_eq!(HybridDecryptor::decrypt(bob().private_key(), &envelope).unwrap(), "hi");
    }

    #[test]
    fn test_decryption_failure_wins_over_signature() {
        let envelope =
            HybridEncryptor::encrypt_signed(bob().public_key(), alice().private_key(), "hi")
                .unwrap();
        assert!(matches!(
            HybridDecryptor::decrypt_and_verify(alice().private_key(), Some(alice().public_key()), &envelope),
            Err(CryptoError::Decryption)
        ));
    }

    #[test]
    fn test_envelope_survives_json() {
        let envelope =
            HybridEncryptor::encrypt_signed(bob().public_key(), alice().private_key(), "stored")
                .unwrap();
        let restored = EncryptedEnvelope::from_json(&envelope.to_json().unwrap()).unwrap();

        let opened =
            HybridDecryptor::decrypt_and_verify(bob().private_key(), Some(alice().public_key()), &restored)
                .unwrap();
        assert_eq!(opened.plaintext, "stored");
        assert!(opened.signature.is_verified());
    }
}
