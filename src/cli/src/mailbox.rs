//! Mail flows over a key store and a message store
//!
//! The CLI subcommands are thin wrappers around these methods.

use securemail_crypto::{
    fingerprint, CryptoError, HybridDecryptor, HybridEncryptor, KeyFingerprint, KeyPairGenerator,
    SignatureStatus,
};
use securemail_vault::{
    normalize_email, Contact, KdfParams, KeyStore, MessageBody, MessageRecord, MessageStore,
    OwnIdentity, ProtectedPrivateKey, VaultError,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;
use zeroize::Zeroizing;

pub type Result<T> = std::result::Result<T, MailboxError>;

#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("No identity is set up; run `securemail setup` first")]
    NotSetUp,

    #[error("Invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error("Recipient key unavailable for {0}")]
    RecipientKeyUnavailable(String),

    #[error("Private key is passphrase-protected; set SECUREMAIL_PASSPHRASE")]
    PassphraseRequired,

    #[error("Key sealing task failed: {0}")]
    KeySealing(String),

    #[error("Message not found: {0}")]
    MessageNotFound(Uuid),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Vault(#[from] VaultError),
}

/// An outgoing message
#[derive(Debug, Clone)]
pub struct Compose {
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Encrypt for the recipient. Requires their public key.
    pub encrypt: bool,
    /// Sign the plaintext. Only applies to encrypted mail.
    pub sign: bool,
}

impl Compose {
    /// Encrypted and signed message
    pub fn new(to: &str, subject: &str, body: &str) -> Self {
        Self {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
            encrypt: true,
            sign: true,
        }
    }

    pub fn plain(mut self) -> Self {
        self.encrypt = false;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.sign = false;
        self
    }
}

/// A message opened for reading
#[derive(Debug, Clone)]
pub struct ReadMessage {
    pub record: MessageRecord,
    pub body: String,
    /// `None` for mail that was sent in plain text
    pub signature: Option<SignatureStatus>,
}

/// One user's view of the shared stores
pub struct Mailbox<K, M> {
    keys: K,
    messages: M,
    generator: KeyPairGenerator,
    protection: Option<KdfParams>,
    passphrase: Option<Zeroizing<String>>,
}

impl<K: KeyStore, M: MessageStore> Mailbox<K, M> {
    pub fn new(keys: K, messages: M) -> Self {
        Self {
            keys,
            messages,
            generator: KeyPairGenerator::new(),
            protection: None,
            passphrase: None,
        }
    }

    pub fn with_generator(mut self, generator: KeyPairGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Seal the private key with these KDF parameters at setup
    pub fn with_key_protection(mut self, kdf: KdfParams) -> Self {
        self.protection = Some(kdf);
        self
    }

    pub fn with_passphrase(mut self, passphrase: String) -> Self {
        self.passphrase = Some(Zeroizing::new(passphrase));
        self
    }

    pub fn key_store(&self) -> &K {
        &self.keys
    }

    pub fn message_store(&self) -> &M {
        &self.messages
    }

    /// Generate a key pair and store it as the local identity.
    ///
    /// Nothing is stored when `cancel` fires before generation finishes.
    pub async fn setup(&self, email: &str, cancel: CancellationToken) -> Result<OwnIdentity> {
        let email = normalize_email(email).map_err(|_| MailboxError::InvalidEmail(email.to_string()))?;
        if self.protection.is_some() && self.passphrase.is_none() {
            return Err(MailboxError::PassphraseRequired);
        }

        let keypair = self.generator.spawn_with_cancellation(cancel).wait().await?;

        let stored_private = match (self.protection, &self.passphrase) {
            (Some(kdf), Some(passphrase)) => {
                // Argon2id is memory-hard; keep it off the runtime workers.
                let private_key = Zeroizing::new(keypair.private_key().to_string());
                let passphrase = passphrase.clone();
                tokio::task::spawn_blocking(move || {
                    ProtectedPrivateKey::seal(&private_key, &passphrase, kdf)?.to_json()
                })
                .await
                .map_err(|e| MailboxError::KeySealing(e.to_string()))??
            }
            _ => keypair.private_key().to_string(),
        };
        let identity = OwnIdentity::new(&email, keypair.public_key(), &stored_private)?;
        self.keys.put_own_identity(&identity)?;

        info!(
            email = %email,
            protected = self.protection.is_some(),
            "Identity set up"
        );
        Ok(identity)
    }

    pub fn identity(&self) -> Result<OwnIdentity> {
        self.keys.own_identity()?.ok_or(MailboxError::NotSetUp)
    }

    pub fn public_key(&self) -> Result<String> {
        Ok(self.identity()?.public_key().to_string())
    }

    pub fn fingerprint(&self) -> Result<KeyFingerprint> {
        Ok(fingerprint(self.identity()?.public_key())?)
    }

    fn private_key(&self, identity: &OwnIdentity) -> Result<Zeroizing<String>> {
        let stored = identity.private_key();
        if !ProtectedPrivateKey::is_protected(stored) {
            return Ok(Zeroizing::new(stored.to_string()));
        }

        let passphrase = self.passphrase.as_ref().ok_or(MailboxError::PassphraseRequired)?;
        Ok(ProtectedPrivateKey::from_json(stored)?.open(passphrase)?)
    }

    /// Store a contact's public key after checking that it parses
    pub fn add_contact(&self, email: &str, public_key: &str) -> Result<KeyFingerprint> {
        let email = normalize_email(email).map_err(|_| MailboxError::InvalidEmail(email.to_string()))?;
        let fp = fingerprint(public_key)?;

        self.keys.put_contact_public_key(&email, public_key.trim())?;
        info!(email = %email, fingerprint = %fp, "Contact key stored");
        Ok(fp)
    }

    pub fn contacts(&self) -> Result<Vec<Contact>> {
        Ok(self.keys.contacts()?)
    }

    /// Compose and deliver a message into the shared store
    pub fn send(&self, compose: &Compose) -> Result<MessageRecord> {
        let identity = self.identity()?;
        let to = normalize_email(&compose.to)
            .map_err(|_| MailboxError::InvalidEmail(compose.to.clone()))?;

        let body = if compose.encrypt {
            let recipient_key = self
                .keys
                .contact_public_key(&to)?
                .ok_or_else(|| MailboxError::RecipientKeyUnavailable(to.clone()))?;

            let envelope = if compose.sign {
                let private_key = self.private_key(&identity)?;
                HybridEncryptor::encrypt_signed(&recipient_key, &private_key, &compose.body)?
            } else {
                HybridEncryptor::encrypt(&recipient_key, &compose.body)?
            };
            MessageBody::Encrypted { envelope }
        } else {
            MessageBody::Plain {
                text: compose.body.clone(),
            }
        };

        let record = MessageRecord::new(identity.email(), &to, &compose.subject, body);
        self.messages.save(&record)?;

        info!(
            id = %record.id,
            to = %record.to,
            encrypted = compose.encrypt,
            signed = compose.encrypt && compose.sign,
            "Message sent"
        );
        Ok(record)
    }

    /// Messages addressed to the local identity, newest first
    pub fn inbox(&self) -> Result<Vec<MessageRecord>> {
        let identity = self.identity()?;
        Ok(self.messages.list(identity.email())?)
    }

    pub fn unread_count(&self) -> Result<usize> {
        let identity = self.identity()?;
        Ok(self.messages.unread_count(identity.email())?)
    }

    /// Mark a message read, then decrypt it and check its signature
    pub fn read(&self, id: Uuid) -> Result<ReadMessage> {
        let identity = self.identity()?;
        let mut record = self
            .messages
            .get(id)?
            .filter(|record| record.to == identity.email())
            .ok_or(MailboxError::MessageNotFound(id))?;

        self.messages.mark_read(id)?;
        record.read = true;

        let (body, signature) = match &record.body {
            MessageBody::Plain { text } => (text.clone(), None),
            MessageBody::Encrypted { envelope } => {
                let private_key = self.private_key(&identity)?;
                let sender_key = self.keys.contact_public_key(&record.from)?;
                if sender_key.is_none() && envelope.is_signed() {
                    debug!(from = %record.from, "No key on file for sender");
                }

                let opened = HybridDecryptor::decrypt_and_verify(
                    &private_key,
                    sender_key.as_deref(),
                    envelope,
                )?;
                (opened.plaintext, Some(opened.signature))
            }
        };

        Ok(ReadMessage {
            record,
            body,
            signature,
        })
    }

    /// Delete a message addressed to the local identity
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let identity = self.identity()?;
        let owned = self
            .messages
            .get(id)?
            .is_some_and(|record| record.to == identity.email());
        if !owned || !self.messages.delete(id)? {
            return Err(MailboxError::MessageNotFound(id));
        }
        info!(id = %id, "Message deleted");
        Ok(())
    }

    /// Forget the local identity. Contacts and messages stay.
    pub fn logout(&self) -> Result<()> {
        self.keys.clear_own_keys()?;
        info!("Own keys cleared");
        Ok(())
    }
}
