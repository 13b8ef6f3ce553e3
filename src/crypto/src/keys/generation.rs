use std::fmt;
use std::time::Instant;

use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::pkcs8::LineEnding;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zeroize::Zeroize;

use crate::config::{CryptoConfig, DEFAULT_RSA_BITS};
use crate::error::{CryptoError, Result};
use crate::keys::pem::{encode_public_key, parse_private_key, parse_public_key};

/// RSA key pair in PEM text form
///
/// The public key is SubjectPublicKeyInfo PEM, the private key PKCS#1 PEM.
/// The private key text is wiped when the pair is dropped.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    public_key: String,
    private_key: String,
}

impl KeyPair {
    /// Rebuild a key pair from stored PEM text, checking that both halves belong together
    pub fn from_pem(public_key: &str, private_key: &str) -> Result<Self> {
        let public = parse_public_key(public_key)?;
        let private = parse_private_key(private_key)?;

        if RsaPublicKey::from(&private) != public {
            return Err(CryptoError::InvalidKey(
                "public key does not match private key".to_string(),
            ));
        }

        Ok(KeyPair {
            public_key: public_key.trim().to_string(),
            private_key: private_key.trim().to_string(),
        })
    }

    /// Public key PEM, safe to share
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Private key PEM, never leaves its owner
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    fn from_private(private: &RsaPrivateKey) -> Result<Self> {
        let private_pem = private
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CryptoError::KeyGeneration(format!("private key encoding: {e}")))?;
        let public_key = encode_public_key(&RsaPublicKey::from(private))
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

        Ok(KeyPair {
            public_key,
            private_key: private_pem.to_string(),
        })
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// RSA key pair generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPairGenerator {
    bits: usize,
}

impl KeyPairGenerator {
    /// Generator for the default 2048-bit modulus
    pub fn new() -> Self {
        KeyPairGenerator {
            bits: DEFAULT_RSA_BITS,
        }
    }

    /// Generator for a specific modulus size (2048 to 4096 bits)
    pub fn with_bits(bits: usize) -> Result<Self> {
        CryptoConfig { rsa_bits: bits }
            .validate()
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

        Ok(KeyPairGenerator { bits })
    }

    /// Generator configured from [`CryptoConfig`]
    pub fn from_config(config: &CryptoConfig) -> Result<Self> {
        Self::with_bits(config.rsa_bits)
    }

    /// Modulus size in bits
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Generate a key pair on the current thread.
    ///
    /// This is a large-prime search and can take seconds; async callers
    /// should use [`KeyPairGenerator::spawn`] instead.
    pub fn generate(&self) -> Result<KeyPair> {
        let started = Instant::now();
        info!(bits = self.bits, "Generating key pair");

        let private = RsaPrivateKey::new(&mut OsRng, self.bits).map_err(|e| {
            warn!(bits = self.bits, error = %e, "Key generation failed");
            CryptoError::KeyGeneration(e.to_string())
        })?;
        let keypair = KeyPair::from_private(&private)?;

        info!(
            bits = self.bits,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Key pair generated"
        );
        Ok(keypair)
    }

    /// Run generation on the blocking thread pool.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(&self) -> KeyGenerationTask {
        self.spawn_with_cancellation(CancellationToken::new())
    }

    /// Run generation on the blocking thread pool, stopping when `cancel` fires.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn_with_cancellation(&self, cancel: CancellationToken) -> KeyGenerationTask {
        let generator = *self;
        let worker_cancel = cancel.clone();

        let handle = tokio::task::spawn_blocking(move || {
            if worker_cancel.is_cancelled() {
                return Err(CryptoError::GenerationCancelled);
            }

            let keypair = generator.generate()?;

            // The prime search itself cannot be interrupted; a late result is discarded here.
            if worker_cancel.is_cancelled() {
                debug!("Discarding key pair generated after cancellation");
                drop(keypair);
                return Err(CryptoError::GenerationCancelled);
            }

            Ok(keypair)
        });

        KeyGenerationTask { handle, cancel }
    }
}

impl Default for KeyPairGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight key generation
///
/// Dropping the task detaches the worker; its result is then discarded.
#[derive(Debug)]
pub struct KeyGenerationTask {
    handle: JoinHandle<Result<KeyPair>>,
    cancel: CancellationToken,
}

impl KeyGenerationTask {
    /// Request cancellation. [`KeyGenerationTask::wait`] then resolves to
    /// [`CryptoError::GenerationCancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this task when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the worker has stopped running
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the key pair, a failure, or cancellation
    pub async fn wait(self) -> Result<KeyPair> {
        let KeyGenerationTask { handle, cancel } = self;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Key generation cancelled");
                Err(CryptoError::GenerationCancelled)
            }
            joined = handle => match joined {
                Ok(result) => result,
                Err(err) => Err(CryptoError::KeyGeneration(format!("worker task failed: {err}"))),
            },
        }
    }
}
