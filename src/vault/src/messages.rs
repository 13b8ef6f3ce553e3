//! Message store contract

use std::sync::Arc;

use chrono::{DateTime, Utc};
use securemail_crypto::EncryptedEnvelope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Message content as stored: readable text or an encrypted envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MessageBody {
    Plain { text: String },
    Encrypted { envelope: EncryptedEnvelope },
}

/// One delivered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: MessageBody,
    pub date: DateTime<Utc>,
    pub read: bool,
}

impl MessageRecord {
    /// New unread record with a fresh id, dated now
    pub fn new(from: &str, to: &str, subject: &str, body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            body,
            date: Utc::now(),
            read: false,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self.body, MessageBody::Encrypted { .. })
    }

    pub fn envelope(&self) -> Option<&EncryptedEnvelope> {
        match &self.body {
            MessageBody::Encrypted { envelope } => Some(envelope),
            MessageBody::Plain { .. } => None,
        }
    }
}

/// Storage for delivered messages
pub trait MessageStore: Send + Sync {
    /// Insert a record, replacing any record with the same id
    fn save(&self, record: &MessageRecord) -> Result<()>;

    /// Messages addressed to `recipient`, newest first
    fn list(&self, recipient: &str) -> Result<Vec<MessageRecord>>;

    fn get(&self, id: Uuid) -> Result<Option<MessageRecord>>;

    /// Set the read flag. Returns false when no such message exists.
    fn mark_read(&self, id: Uuid) -> Result<bool>;

    /// Remove a message. Returns false when no such message exists.
    fn delete(&self, id: Uuid) -> Result<bool>;

    fn unread_count(&self, recipient: &str) -> Result<usize> {
        Ok(self.list(recipient)?.iter().filter(|m| !m.read).count())
    }
}

impl<T: MessageStore + ?Sized> MessageStore for Arc<T> {
    fn save(&self, record: &MessageRecord) -> Result<()> {
        (**self).save(record)
    }

    fn list(&self, recipient: &str) -> Result<Vec<MessageRecord>> {
        (**self).list(recipient)
    }

    fn get(&self, id: Uuid) -> Result<Option<MessageRecord>> {
        (**self).get(id)
    }

    fn mark_read(&self, id: Uuid) -> Result<bool> {
        (**self).mark_read(id)
    }

    fn delete(&self, id: Uuid) -> Result<bool> {
        (**self).delete(id)
    }

    fn unread_count(&self, recipient: &str) -> Result<usize> {
        (**self).unread_count(recipient)
    }
}

pub(crate) fn sort_newest_first(records: &mut [MessageRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
}
