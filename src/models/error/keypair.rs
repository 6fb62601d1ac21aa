use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeypairError {
    #[error("Invalid encoded key: {0}")]
    InvalidEncoding(String),

    #[error("Invalid version byte: expected {expected}, got {actual}")]
    InvalidVersionByte { expected: u8, actual: u8 },

    #[error("Invalid checksum")]
    InvalidChecksum,

    #[error("Private key is required to perform this operation")]
    MissingSecretKey,

    #[error("Signing error: {0}")]
    SigningError(String),
}
