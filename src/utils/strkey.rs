//! Address text codec
//!
//! Ledger keys are rendered as base32(version ‖ payload ‖ checksum) by
//! `stellar-strkey`. The checksum is verified on every decode; a mismatch is a
//! hard failure.

use stellar_strkey::{
    ed25519::{PrivateKey, PublicKey},
    Strkey,
};

use crate::models::KeypairError;

/// Version byte for public account addresses (encodes to a leading `G`).
pub const VERSION_BYTE_ACCOUNT_ID: u8 = 6 << 3;

/// Version byte for secret seeds (encodes to a leading `S`).
pub const VERSION_BYTE_SEED: u8 = 18 << 3;

/// Length of an encoded 32-byte key: (1 + 32 + 2) bytes * 8 / 5 bits.
pub const ENCODED_KEY_LENGTH: usize = 56;

const BASE32_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

pub fn encode_account_id(key: &[u8; 32]) -> String {
    PublicKey(*key).to_string()
}

pub fn encode_seed(seed: &[u8; 32]) -> String {
    PrivateKey(*seed).to_string()
}

/// Decodes a `G...` address.
pub fn decode_account_id(encoded: &str) -> Result<[u8; 32], KeypairError> {
    PublicKey::from_string(encoded)
        .map(|key| key.0)
        .map_err(|_| classify_failure(VERSION_BYTE_ACCOUNT_ID, encoded))
}

/// Decodes an `S...` secret seed.
pub fn decode_seed(encoded: &str) -> Result<[u8; 32], KeypairError> {
    PrivateKey::from_string(encoded)
        .map(|key| key.0)
        .map_err(|_| classify_failure(VERSION_BYTE_SEED, encoded))
}

/// Turns the codec's opaque decode failure into a specific error.
fn classify_failure(expected: u8, encoded: &str) -> KeypairError {
    if encoded.len() != ENCODED_KEY_LENGTH {
        return KeypairError::InvalidEncoding(format!(
            "expected {} characters, got {}",
            ENCODED_KEY_LENGTH,
            encoded.len()
        ));
    }
    if let Some(ch) = encoded.chars().find(|c| !BASE32_ALPHABET.contains(*c)) {
        return KeypairError::InvalidEncoding(format!("invalid base32 character '{}'", ch));
    }
    // a well-formed key of another kind
    if Strkey::from_string(encoded).is_ok() {
        let actual = encoded
            .chars()
            .next()
            .and_then(|c| BASE32_ALPHABET.find(c))
            .map(|index| (index as u8) << 3)
            .unwrap_or_default();
        return KeypairError::InvalidVersionByte { expected, actual };
    }
    KeypairError::InvalidChecksum
}
