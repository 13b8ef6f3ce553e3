//! Property tests over the fixture key pairs

use proptest::prelude::*;
use securemail_crypto::{sign, verify, HybridDecryptor, HybridEncryptor};

use crate::fixtures::{alice, bob};

proptest! {
    // Each case performs RSA private-key operations; keep the case count modest.
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_round_trip(plaintext in "\\PC{0,512}") {
        let envelope = HybridEncryptor::encrypt(alice().public_key(), &plaintext).unwrap();
        let decrypted = HybridDecryptor::decrypt(alice().private_key(), &envelope).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn prop_fresh_key_and_iv(plaintext in "\\PC{0,64}") {
        let first = HybridEncryptor::encrypt(alice().public_key(), &plaintext).unwrap();
        let second = HybridEncryptor::encrypt(alice().public_key(), &plaintext).unwrap();
        prop_assert_ne!(first.ciphertext(), second.ciphertext());
        prop_assert_ne!(first.iv(), second.iv());
    }

    #[test]
    fn prop_cross_key_never_yields_plaintext(plaintext in "\\PC{1,128}") {
        let envelope = HybridEncryptor::encrypt(alice().public_key(), &plaintext).unwrap();
        prop_assert!(HybridDecryptor::decrypt(bob().private_key(), &envelope).is_err());
    }

    #[test]
    fn prop_signature_binds_message(message in "\\PC{0,128}", other in "\\PC{0,128}") {
        let signature = sign(bob().private_key(), &message).unwrap();
        prop_assert!(verify(bob().public_key(), &message, &signature).unwrap());
        // Verification is a pure function of its inputs.
        prop_assert!(verify(bob().public_key(), &message, &signature).unwrap());

        if other != message {
            prop_assert!(!verify(bob().public_key(), &other, &signature).unwrap());
        }
    }
}
