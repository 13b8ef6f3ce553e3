//! SecureMail host library
//!
//! Configuration and the mail flows behind the `securemail` binary.

pub mod config;
pub mod mailbox;

pub use config::CliConfig;
pub use mailbox::{Compose, Mailbox, MailboxError, ReadMessage};
