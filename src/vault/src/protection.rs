//! Passphrase protection for the private key at rest
//!
//! The PEM is sealed with AES-256-GCM under a key derived from the
//! passphrase with Argon2id. The result is a self-describing JSON document:
//!
//! ```json
//! {"version":1,"kdf":{"m_cost":65536,"t_cost":3,"p_cost":4},
//!  "salt":"...","nonce":"...","ciphertext":"..."}
//! ```

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use securemail_crypto::encoding;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

pub const PROTECTED_KEY_VERSION: u8 = 1;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const AAD: &[u8] = b"securemail-private-key-v1";

// Argon2 params (OWASP recommendations)
const ARGON2_M_COST: u32 = 65536; // 64 MiB
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory in KiB
    #[serde(default = "default_m_cost")]
    pub m_cost: u32,

    /// Iterations
    #[serde(default = "default_t_cost")]
    pub t_cost: u32,

    /// Lanes
    #[serde(default = "default_p_cost")]
    pub p_cost: u32,
}

fn default_m_cost() -> u32 { ARGON2_M_COST }
fn default_t_cost() -> u32 { ARGON2_T_COST }
fn default_p_cost() -> u32 { ARGON2_P_COST }

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: ARGON2_M_COST,
            t_cost: ARGON2_T_COST,
            p_cost: ARGON2_P_COST,
        }
    }
}

impl KdfParams {
    /// Check that Argon2 accepts these parameters
    pub fn validate(&self) -> Result<()> {
        self.argon2().map(|_| ())
    }

    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.m_cost, self.t_cost, self.p_cost, Some(KEY_LEN))
            .map_err(|e| VaultError::KeyProtection(format!("invalid Argon2 parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        self.argon2()?
            .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
            .map_err(|e| VaultError::KeyProtection(format!("key derivation failed: {e}")))?;
        Ok(key)
    }
}

/// A private key sealed under a passphrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedPrivateKey {
    version: u8,
    kdf: KdfParams,
    salt: String,
    nonce: String,
    ciphertext: String,
}

impl ProtectedPrivateKey {
    /// Seal `private_key_pem` under `passphrase`
    pub fn seal(private_key_pem: &str, passphrase: &str, kdf: KdfParams) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(VaultError::KeyProtection("passphrase is empty".to_string()));
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);

        let key = kdf.derive_key(passphrase, &salt)?;
        let cipher = Aes256Gcm::new((&*key).into());
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: private_key_pem.as_bytes(),
                    aad: AAD,
                },
            )
            .map_err(|e| VaultError::KeyProtection(format!("sealing failed: {e}")))?;

        debug!(m_cost = kdf.m_cost, t_cost = kdf.t_cost, p_cost = kdf.p_cost, "Sealed private key");

        Ok(Self {
            version: PROTECTED_KEY_VERSION,
            kdf,
            salt: encoding::encode(&salt),
            nonce: encoding::encode(&nonce),
            ciphertext: encoding::encode(&ciphertext),
        })
    }

    /// Recover the PEM. A wrong passphrase and a tampered document both
    /// report [`VaultError::WrongPassphrase`].
    pub fn open(&self, passphrase: &str) -> Result<Zeroizing<String>> {
        if self.version != PROTECTED_KEY_VERSION {
            return Err(VaultError::KeyProtection(format!(
                "unsupported protected key version: {}",
                self.version
            )));
        }

        let salt = decode_field("salt", &self.salt)?;
        let nonce = decode_field("nonce", &self.nonce)?;
        let ciphertext = decode_field("ciphertext", &self.ciphertext)?;
        if nonce.len() != NONCE_LEN {
            return Err(VaultError::KeyProtection(format!("nonce is {} bytes", nonce.len())));
        }

        let key = self.kdf.derive_key(passphrase, &salt)?;
        let cipher = Aes256Gcm::new((&*key).into());
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(
                    Nonce::from_slice(&nonce),
                    Payload {
                        msg: &ciphertext,
                        aad: AAD,
                    },
                )
                .map_err(|_| {
                    warn!("Private key could not be unsealed");
                    VaultError::WrongPassphrase
                })?,
        );

        let pem = std::str::from_utf8(&plaintext)
            .map_err(|_| VaultError::KeyProtection("sealed key is not UTF-8".to_string()))?;
        Ok(Zeroizing::new(pem.to_string()))
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether stored private-key text is a sealed document rather than PEM
    pub fn is_protected(text: &str) -> bool {
        let text = text.trim_start();
        text.starts_with('{') && Self::from_json(text).is_ok()
    }
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>> {
    encoding::decode(value)
        .map_err(|e| VaultError::KeyProtection(format!("{name} is not base64: {e}")))
}
