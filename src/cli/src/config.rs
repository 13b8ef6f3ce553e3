//! CLI configuration loading and validation

use anyhow::{Context, Result};
use securemail_crypto::CryptoConfig;
use securemail_vault::KdfParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the sled database inside the data directory
pub const STORE_DIR_NAME: &str = "mail.db";

/// Complete CLI configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub mail: MailSection,

    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub crypto: CryptoConfig,

    #[serde(default)]
    pub vault: VaultSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VaultSection {
    /// Seal the private key under `SECUREMAIL_PASSPHRASE` before storing it
    #[serde(default)]
    pub protect_private_key: bool,

    #[serde(default)]
    pub kdf: KdfParams,
}

impl Default for MailSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf { PathBuf::from(".securemail") }
fn default_log_level() -> String { "info".to_string() }

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl CliConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .context("Failed to read configuration file")?;

        let config: CliConfig = toml::from_str(&contents)
            .context("Failed to parse configuration file")?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            anyhow::bail!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            );
        }

        self.crypto
            .validate()
            .context("Invalid [crypto] section")?;

        self.vault
            .kdf
            .validate()
            .context("Invalid [vault.kdf] section")?;

        if self.mail.data_dir.as_os_str().is_empty() {
            anyhow::bail!("mail.data_dir must not be empty");
        }

        Ok(())
    }

    /// Get absolute data directory path
    pub fn data_dir(&self) -> PathBuf {
        if self.mail.data_dir.is_absolute() {
            self.mail.data_dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.mail.data_dir)
        }
    }

    /// Get absolute store path
    pub fn store_path(&self) -> PathBuf {
        self.data_dir().join(STORE_DIR_NAME)
    }
}
