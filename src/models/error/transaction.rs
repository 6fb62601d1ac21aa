use super::{KeypairError, XdrError};
use crate::models::TransactionStatus;
use thiserror::Error;

/// Errors raised while building, signing or serializing a transaction.
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Maximum number of operations per transaction ({0}) exceeded")]
    TooManyOperations(usize),

    #[error("Transaction has no operations")]
    MissingOperation,

    #[error("Invalid transaction state: expected {expected:?}, found {actual:?}")]
    InvalidState {
        expected: TransactionStatus,
        actual: TransactionStatus,
    },

    #[error("No signers supplied")]
    NoSigners,

    #[error("Signer error: {0}")]
    Signer(#[from] KeypairError),

    #[error("XDR error: {0}")]
    Xdr(#[from] XdrError),
}
