//! Key pairs shared across the suite

use std::sync::OnceLock;

use securemail_crypto::{KeyPair, KeyPairGenerator};

static ALICE: OnceLock<KeyPair> = OnceLock::new();
static BOB: OnceLock<KeyPair> = OnceLock::new();

pub fn alice() -> &'static KeyPair {
    ALICE.get_or_init(|| KeyPairGenerator::new().generate().unwrap())
}

pub fn bob() -> &'static KeyPair {
    BOB.get_or_init(|| KeyPairGenerator::new().generate().unwrap())
}
