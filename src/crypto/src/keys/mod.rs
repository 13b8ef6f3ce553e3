pub mod generation;
pub mod pem;

pub use generation::{KeyGenerationTask, KeyPair, KeyPairGenerator};
pub use pem::{
    encode_public_key, fingerprint, parse_private_key, parse_public_key,
    public_key_from_private, KeyFingerprint,
};
