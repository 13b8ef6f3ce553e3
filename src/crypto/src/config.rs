//! Tunables for the cryptographic core

use crate::error::{CryptoError, Result};
use serde::{Deserialize, Serialize};

/// Smallest RSA modulus the generator will produce
pub const MIN_RSA_BITS: usize = 2048;

/// Largest RSA modulus the key parser accepts
pub const MAX_RSA_BITS: usize = 4096;

/// Modulus size used when nothing else is configured
pub const DEFAULT_RSA_BITS: usize = 2048;

/// Configuration for key generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// RSA modulus size in bits
    #[serde(default = "default_rsa_bits")]
    pub rsa_bits: usize,
}

fn default_rsa_bits() -> usize { DEFAULT_RSA_BITS }

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            rsa_bits: DEFAULT_RSA_BITS,
        }
    }
}

impl CryptoConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.rsa_bits < MIN_RSA_BITS {
            return Err(CryptoError::InvalidConfig(format!(
                "rsa_bits must be at least {} (got {})",
                MIN_RSA_BITS, self.rsa_bits
            )));
        }

        if self.rsa_bits > MAX_RSA_BITS {
            return Err(CryptoError::InvalidConfig(format!(
                "rsa_bits must be at most {} (got {})",
                MAX_RSA_BITS, self.rsa_bits
            )));
        }

        if self.rsa_bits % 8 != 0 {
            return Err(CryptoError::InvalidConfig(format!(
                "rsa_bits must be a multiple of 8 (got {})",
                self.rsa_bits
            )));
        }

        Ok(())
    }
}
