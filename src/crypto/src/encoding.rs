//! Base64 text encoding for binary cryptographic material
//!
//! Standard alphabet with padding, so values survive text storage and
//! copy/paste unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode bytes as base64 text
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode base64 text, ignoring surrounding whitespace
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(text.trim())
}
