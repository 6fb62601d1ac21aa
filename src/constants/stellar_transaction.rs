//! Constants for Stellar transaction construction and encoding.

/// Base fee per operation, in stroops.
pub const STELLAR_DEFAULT_TRANSACTION_FEE: u32 = 100;
/// Maximum number of operations allowed in a Stellar transaction
pub const STELLAR_MAX_OPERATIONS: usize = 100;
/// Maximum number of signatures attached to one envelope.
pub const STELLAR_MAX_SIGNATURES: usize = 20;

/// Stroops per lumen (and per unit of any asset): amounts carry 7 decimals.
pub const STROOPS_PER_UNIT: i64 = 10_000_000;
/// Number of decimal places carried by an amount.
pub const AMOUNT_DECIMALS: usize = 7;

/// Envelope discriminant mixed into the transaction hash.
pub const ENVELOPE_TYPE_TX: i32 = 2;

/// Maximum byte length of a text memo.
pub const MEMO_TEXT_MAX_LENGTH: usize = 28;
/// Maximum byte length of a signature in a decorated signature.
pub const SIGNATURE_MAX_LENGTH: usize = 64;
/// Length of the signature hint (trailing bytes of the public key).
pub const SIGNATURE_HINT_LENGTH: usize = 4;

/// Trust limit used when a trust line is opened without an explicit limit
/// (the largest representable amount).
pub const STELLAR_DEFAULT_TRUST_LIMIT: i64 = i64::MAX;
