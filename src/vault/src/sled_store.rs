//! Persistent store on sled
//!
//! One database, three trees:
//! - `identity` - the local identity under a single fixed key
//! - `contacts` - public keys keyed by email
//! - `messages` - message records keyed by UUID bytes
//!
//! Values are JSON.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::keys::{normalize_email, validate_contact, Contact, KeyStore, OwnIdentity};
use crate::messages::{sort_newest_first, MessageRecord, MessageStore};

pub const TREE_IDENTITY: &str = "identity";
pub const TREE_CONTACTS: &str = "contacts";
pub const TREE_MESSAGES: &str = "messages";

const IDENTITY_KEY: &[u8] = b"own";

/// sled-backed [`KeyStore`] and [`MessageStore`]
#[derive(Debug, Clone)]
pub struct SledStore {
    db: sled::Db,
    identity: sled::Tree,
    contacts: sled::Tree,
    messages: sled::Tree,
}

impl SledStore {
    /// Open or create a database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Opened mail store");
        Self::from_db(db)
    }

    /// Database that is removed when the last handle drops
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        Ok(Self {
            identity: db.open_tree(TREE_IDENTITY)?,
            contacts: db.open_tree(TREE_CONTACTS)?,
            messages: db.open_tree(TREE_MESSAGES)?,
            db,
        })
    }

    /// Write pending changes to disk
    pub fn flush(&self) -> Result<()> {
        let bytes = self.db.flush()?;
        debug!(bytes, "Flushed mail store");
        Ok(())
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

impl KeyStore for SledStore {
    fn own_identity(&self) -> Result<Option<OwnIdentity>> {
        self.identity
            .get(IDENTITY_KEY)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn put_own_identity(&self, identity: &OwnIdentity) -> Result<()> {
        self.identity.insert(IDENTITY_KEY, encode(identity)?)?;
        Ok(())
    }

    fn contact_public_key(&self, email: &str) -> Result<Option<String>> {
        let Ok(email) = normalize_email(email) else {
            return Ok(None);
        };
        self.contacts
            .get(email.as_bytes())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn put_contact_public_key(&self, email: &str, public_key: &str) -> Result<()> {
        let email = validate_contact(email, public_key)?;
        self.contacts.insert(email.as_bytes(), encode(&public_key)?)?;
        Ok(())
    }

    fn contacts(&self) -> Result<Vec<Contact>> {
        self.contacts
            .iter()
            .map(|entry| {
                let (key, value) = entry?;
                Ok(Contact {
                    email: String::from_utf8_lossy(&key).into_owned(),
                    public_key: decode(&value)?,
                })
            })
            .collect()
    }

    fn clear_own_keys(&self) -> Result<()> {
        self.identity.remove(IDENTITY_KEY)?;
        Ok(())
    }
}

impl MessageStore for SledStore {
    fn save(&self, record: &MessageRecord) -> Result<()> {
        self.messages.insert(record.id.as_bytes(), encode(record)?)?;
        Ok(())
    }

    fn list(&self, recipient: &str) -> Result<Vec<MessageRecord>> {
        let mut records = Vec::new();
        for entry in self.messages.iter() {
            let (_, value) = entry?;
            let record: MessageRecord = decode(&value)?;
            if record.to == recipient {
                records.push(record);
            }
        }
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn get(&self, id: Uuid) -> Result<Option<MessageRecord>> {
        self.messages
            .get(id.as_bytes())?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    fn mark_read(&self, id: Uuid) -> Result<bool> {
        // Compare-and-swap loop: a concurrent delete wins and is never undone.
        let mut failure = None;
        let updated = self.messages.update_and_fetch(id.as_bytes(), |current| {
            let bytes = current?;
            let flagged = decode::<MessageRecord>(bytes).and_then(|mut record| {
                record.read = true;
                encode(&record)
            });
            match flagged {
                Ok(updated) => Some(updated),
                Err(e) => {
                    failure = Some(e);
                    Some(bytes.to_vec())
                }
            }
        })?;

        if let Some(e) = failure {
            return Err(e);
        }
        Ok(updated.is_some())
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.messages.remove(id.as_bytes())?.is_some())
    }
}
