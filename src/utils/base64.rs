// base64 encode and decode helper functions

use base64::Engine;

pub fn base64_encode(message: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(message)
}

pub fn base64_decode(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(data)
}

/// Decodes a base64 value into text, falling back to the raw encoding when
/// the payload is not valid base64 or not UTF-8. Used for account data
/// entries, which are opaque on the ledger but usually hold text.
pub fn base64_decode_to_text(data: &str) -> String {
    base64_decode(data)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| data.to_string())
}
