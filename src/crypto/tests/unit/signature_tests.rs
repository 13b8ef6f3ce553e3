//! Tests for detached RSA signatures

use securemail_crypto::encoding;
use securemail_crypto::error::CryptoError;
use securemail_crypto::signatures::{self, RsaSha256, SignatureScheme};

use crate::fixtures::{alice, bob};

#[cfg(test)]
mod sign_verify_tests {
    use super::*;

    #[test]
    fn test_sign_then_verify() {
        let signature = signatures::sign(alice().private_key(), "message").unwrap();
        assert!(signatures::verify(alice().public_key(), "message", &signature).unwrap());
    }

    #[test]
    fn test_signature_is_modulus_sized() {
        let signature = signatures::sign(alice().private_key(), "message").unwrap();
        assert_eq!(encoding::decode(&signature).unwrap().len(), 256);
    }

    #[test]
    fn test_deterministic() {
        let first = signatures::sign(alice().private_key(), "same text").unwrap();
        let second = signatures::sign(alice().private_key(), "same text").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_message() {
        let signature = signatures::sign(alice().private_key(), "").unwrap();
        assert!(signatures::verify(alice().public_key(), "", &signature).unwrap());
        assert!(!signatures::verify(alice().public_key(), " ", &signature).unwrap());
    }

    #[test]
    fn test_scheme_trait_object() {
        let scheme: Box<dyn SignatureScheme> = Box::new(RsaSha256);
        assert_eq!(scheme.name(), "RSASSA-PKCS1-v1_5-SHA256");

        let signature = scheme.sign(bob().private_key(), "via trait").unwrap();
        assert!(scheme.verify(bob().public_key(), "via trait", &signature).unwrap());
    }
}

#[cfg(test)]
mod verification_failure_tests {
    use super::*;

    #[test]
    fn test_altered_message() {
        let signature = signatures::sign(alice().private_key(), "pay 10").unwrap();
        assert!(!signatures::verify(alice().public_key(), "pay 100", &signature).unwrap());
    }

    #[test]
    fn test_other_signer() {
        let signature = signatures::sign(bob().private_key(), "message").unwrap();
        assert!(!signatures::verify(alice().public_key(), "message", &signature).unwrap());
    }

    #[test]
    fn test_flipped_signature_bit() {
        let signature = signatures::sign(alice().private_key(), "message").unwrap();
        let mut raw = encoding::decode(&signature).unwrap();
        raw[0] ^= 0x80;

        assert!(!signatures::verify(alice().public_key(), "message", &encoding::encode(&raw)).unwrap());
    }

    #[test]
    fn test_malformed_inputs_are_errors() {
        let signature = signatures::sign(alice().private_key(), "message").unwrap();

        assert!(matches!(
            signatures::verify("not a key", "message", &signature),
            Err(CryptoError::SignatureVerification(_))
        ));
        assert!(matches!(
            signatures::verify(alice().public_key(), "message", "***"),
            Err(CryptoError::SignatureVerification(_))
        ));
        assert!(matches!(
            signatures::sign(alice().public_key(), "message"),
            Err(CryptoError::SignatureGeneration(_))
        ));
    }
}
