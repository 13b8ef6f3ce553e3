//! # SecureMail Vault Module
//!
//! Storage collaborators for the cryptographic core.
//!
//! ## Features
//!
//! - **Key Store**: the local identity (email + key pair) and contacts' public keys
//! - **Message Store**: delivered message records, plain or encrypted
//! - **Backends**: in-memory stores and a persistent sled database
//! - **Key Protection**: Argon2id + AES-256-GCM sealing of the private key at rest
//!
//! ## Module Structure
//!
//! ```text
//! vault/
//! ├── keys        - KeyStore contract and identity types
//! ├── messages    - MessageStore contract and record types
//! ├── memory      - In-memory backends
//! ├── sled_store  - Persistent backend
//! └── protection  - Passphrase-sealed private keys
//! ```

pub mod error;
pub mod keys;
pub mod memory;
pub mod messages;
pub mod protection;
pub mod sled_store;

pub use error::{Result, VaultError};
pub use keys::{normalize_email, Contact, KeyStore, OwnIdentity};
pub use memory::{MemoryKeyStore, MemoryMessageStore};
pub use messages::{MessageBody, MessageRecord, MessageStore};
pub use protection::{KdfParams, ProtectedPrivateKey};
pub use sled_store::SledStore;
