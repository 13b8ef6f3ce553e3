//! Test suite for securemail-crypto
//!
//! ## Test Organization
//!
//! - `unit/` - Behaviour of individual components through the public API
//! - `integration/` - Complete sender/recipient workflows
//! - `fixtures` - Shared key pairs
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all tests
//! cargo test -p securemail-crypto
//!
//! # Run only the in-crate unit tests
//! cargo test -p securemail-crypto --lib
//!
//! # Run a specific test module
//! cargo test -p securemail-crypto hybrid_crypto_tests
//! ```
//!
//! RSA key generation dominates test time, so most tests borrow the
//! fixture key pairs instead of generating their own.

pub mod fixtures;
pub mod integration;
