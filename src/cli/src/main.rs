//! SecureMail - Main Binary
//!
//! End-to-end encrypted mail between users sharing one local store:
//! - RSA-2048 identities, generated in the background and cancellable
//! - AES-256-CBC + RSA-OAEP message encryption
//! - Signed messages verified against stored contact keys

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use securemail_crypto::{fingerprint, CryptoError, KeyPairGenerator, SignatureStatus};
use securemail_cli::{CliConfig, Compose, Mailbox, MailboxError};
use securemail_vault::SledStore;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

/// SecureMail CLI
#[derive(Parser)]
#[command(name = "securemail")]
#[command(about = "SecureMail - end-to-end encrypted local mail")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "securemail.toml", env = "SECUREMAIL_CONFIG")]
    config: PathBuf,

    /// Data directory (overrides config)
    #[arg(long, env = "SECUREMAIL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Passphrase for a protected private key
    #[arg(long, env = "SECUREMAIL_PASSPHRASE", hide_env_values = true)]
    passphrase: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a key pair and register this mailbox
    Setup {
        #[arg(long)]
        email: String,
    },

    /// Print own public key
    PublicKey,

    /// Print own public key fingerprint
    Fingerprint,

    /// Store a contact's public key
    AddContact {
        #[arg(long)]
        email: String,

        /// PEM file holding the contact's public key
        #[arg(long)]
        key_file: PathBuf,
    },

    /// List contacts
    Contacts,

    /// Send a message
    Send {
        #[arg(long)]
        to: String,

        #[arg(long)]
        subject: String,

        #[arg(long)]
        body: String,

        /// Send without encryption
        #[arg(long)]
        plain: bool,

        /// Encrypt without signing
        #[arg(long)]
        no_sign: bool,
    },

    /// List received messages
    Inbox,

    /// Read a message
    Read {
        #[arg(long)]
        id: Uuid,
    },

    /// Delete a message
    Delete {
        #[arg(long)]
        id: Uuid,
    },

    /// Forget own keys (contacts and messages are kept)
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = CliConfig::load_or_default(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.mail.data_dir = data_dir;
    }
    config.validate()?;

    // Initialize logging
    let log_level = if cli.verbose { "debug".to_string() } else { config.logging.level.clone() };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Loaded configuration from {:?}", cli.config);

    std::fs::create_dir_all(config.data_dir()).context("Failed to create data directory")?;
    let store = SledStore::open(config.store_path()).context("Failed to open mail store")?;

    let generator = KeyPairGenerator::from_config(&config.crypto)?;
    let mut mailbox = Mailbox::new(store.clone(), store.clone()).with_generator(generator);
    if config.vault.protect_private_key {
        mailbox = mailbox.with_key_protection(config.vault.kdf);
    }
    if let Some(passphrase) = cli.passphrase {
        mailbox = mailbox.with_passphrase(passphrase);
    }

    let result = run(cli.command, &mailbox).await;
    store.flush().context("Failed to flush mail store")?;
    result
}

async fn run(command: Command, mailbox: &Mailbox<SledStore, SledStore>) -> Result<()> {
    match command {
        Command::Setup { email } => setup(mailbox, &email).await?,
        Command::PublicKey => print!("{}", ensure_newline(mailbox.public_key()?)),
        Command::Fingerprint => println!("{}", mailbox.fingerprint()?),
        Command::AddContact { email, key_file } => {
            let public_key = std::fs::read_to_string(&key_file)
                .with_context(|| format!("Failed to read key file {:?}", key_file))?;
            let fp = mailbox.add_contact(&email, &public_key)?;
            println!("Added {email}\n  fingerprint {fp}");
        }
        Command::Contacts => {
            for contact in mailbox.contacts()? {
                match fingerprint(&contact.public_key) {
                    Ok(fp) => println!("{}\n  {}", contact.email, fp),
                    Err(_) => println!("{}\n  <unreadable key>", contact.email),
                }
            }
        }
        Command::Send {
            to,
            subject,
            body,
            plain,
            no_sign,
        } => {
            let mut compose = Compose::new(&to, &subject, &body);
            if plain {
                compose = compose.plain();
            }
            if no_sign {
                compose = compose.unsigned();
            }
            let record = mailbox.send(&compose)?;
            println!("Sent {} to {}", record.id, record.to);
        }
        Command::Inbox => {
            let messages = mailbox.inbox()?;
            println!(
                "{} message(s), {} unread",
                messages.len(),
                messages.iter().filter(|m| !m.read).count()
            );
            for message in messages {
                println!(
                    "{} {} {:<24} {}{}  ({})",
                    if message.read { ' ' } else { '*' },
                    message.date.format("%Y-%m-%d %H:%M"),
                    message.from,
                    message.subject,
                    if message.is_encrypted() { "  [encrypted]" } else { "" },
                    message.id,
                );
            }
        }
        Command::Read { id } => {
            let message = mailbox.read(id)?;
            println!("From:    {}", message.record.from);
            println!("To:      {}", message.record.to);
            println!("Date:    {}", message.record.date.to_rfc3339());
            println!("Subject: {}", message.record.subject);
            if let Some(status) = message.signature {
                println!("Signature: {}", describe_signature(status));
            }
            println!();
            println!("{}", message.body);
        }
        Command::Delete { id } => {
            mailbox.delete(id)?;
            println!("Deleted {id}");
        }
        Command::Logout => {
            mailbox.logout()?;
            println!("Own keys cleared; contacts and messages kept");
        }
    }

    Ok(())
}

async fn setup(mailbox: &Mailbox<SledStore, SledStore>, email: &str) -> Result<()> {
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling key generation");
            ctrl_c_cancel.cancel();
        }
    });

    eprintln!("Generating key pair; this can take a few seconds (Ctrl+C to cancel)");
    let result = mailbox.setup(email, cancel).await;
    watcher.abort();

    match result {
        Ok(identity) => {
            println!("Set up {}", identity.email());
            println!("  fingerprint {}", fingerprint(identity.public_key())?);
            Ok(())
        }
        Err(MailboxError::Crypto(CryptoError::GenerationCancelled)) => {
            println!("Setup cancelled; no keys were stored");
            Ok(())
        }
        Err(err) => Err(err).context("Setup failed"),
    }
}

fn describe_signature(status: SignatureStatus) -> &'static str {
    match status {
        SignatureStatus::Verified => "verified",
        SignatureStatus::Invalid => "INVALID - message may have been altered",
        SignatureStatus::Unsigned => "unsigned",
        SignatureStatus::SenderKeyUnavailable => "cannot verify signature (sender key unknown)",
    }
}

fn ensure_newline(mut text: String) -> String {
    if !text.ends_with('\n') {
        text.push('\n');
    }
    text
}
