use thiserror::Error;

/// Errors raised when constructing ledger value types from user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    #[error("Invalid memo: {0}")]
    InvalidMemo(String),

    #[error("Invalid Horizon record: {0}")]
    InvalidRecord(String),
}
