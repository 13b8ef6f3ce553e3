//! Process-local stores

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::keys::{normalize_email, validate_contact, Contact, KeyStore, OwnIdentity};
use crate::messages::{sort_newest_first, MessageRecord, MessageStore};

/// In-memory [`KeyStore`]
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    identity: RwLock<Option<OwnIdentity>>,
    contacts: RwLock<BTreeMap<String, String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn own_identity(&self) -> Result<Option<OwnIdentity>> {
        Ok(self.identity.read().clone())
    }

    fn put_own_identity(&self, identity: &OwnIdentity) -> Result<()> {
        *self.identity.write() = Some(identity.clone());
        Ok(())
    }

    fn contact_public_key(&self, email: &str) -> Result<Option<String>> {
        let Ok(email) = normalize_email(email) else {
            return Ok(None);
        };
        Ok(self.contacts.read().get(&email).cloned())
    }

    fn put_contact_public_key(&self, email: &str, public_key: &str) -> Result<()> {
        let email = validate_contact(email, public_key)?;
        self.contacts.write().insert(email, public_key.to_string());
        Ok(())
    }

    fn contacts(&self) -> Result<Vec<Contact>> {
        Ok(self
            .contacts
            .read()
            .iter()
            .map(|(email, public_key)| Contact {
                email: email.clone(),
                public_key: public_key.clone(),
            })
            .collect())
    }

    fn clear_own_keys(&self) -> Result<()> {
        self.identity.write().take();
        Ok(())
    }
}

/// In-memory [`MessageStore`]
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    messages: RwLock<HashMap<Uuid, MessageRecord>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for MemoryMessageStore {
    fn save(&self, record: &MessageRecord) -> Result<()> {
        self.messages.write().insert(record.id, record.clone());
        Ok(())
    }

    fn list(&self, recipient: &str) -> Result<Vec<MessageRecord>> {
        let mut records: Vec<MessageRecord> = self
            .messages
            .read()
            .values()
            .filter(|m| m.to == recipient)
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn get(&self, id: Uuid) -> Result<Option<MessageRecord>> {
        Ok(self.messages.read().get(&id).cloned())
    }

    fn mark_read(&self, id: Uuid) -> Result<bool> {
        match self.messages.write().get_mut(&id) {
            Some(record) => {
                record.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.messages.write().remove(&id).is_some())
    }
}
