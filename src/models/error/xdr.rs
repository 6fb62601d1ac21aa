use thiserror::Error;

/// Failures raised while encoding or decoding the ledger's XDR wire format.
///
/// Decoding never yields a partially populated value: the first violation
/// aborts the whole decode call with one of these variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XdrError {
    #[error("Unexpected end of XDR data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("Declared length {length} exceeds maximum of {max}")]
    LengthExceedsMax { length: usize, max: usize },

    #[error("Fixed opaque value has {actual} bytes, expected at most {expected}")]
    InvalidFixedLength { expected: usize, actual: usize },

    #[error("Invalid boolean value: {0}")]
    InvalidBool(u32),

    #[error("Non-zero padding byte in XDR data")]
    NonZeroPadding,

    #[error("Invalid UTF-8 string: {0}")]
    InvalidUtf8(String),

    #[error("Invalid {kind} discriminant: {value}")]
    InvalidDiscriminant { kind: &'static str, value: i32 },

    #[error("Operation type with code '{0}' is not implemented")]
    UnsupportedOperation(i32),

    #[error("Operation result type with code '{0}' is not implemented")]
    UnsupportedOperationResult(i32),

    #[error("{0} trailing bytes after XDR value")]
    TrailingBytes(usize),

    #[error("Invalid base64 XDR: {0}")]
    InvalidBase64(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
