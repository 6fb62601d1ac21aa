use super::{TransactionError, ValueError, XdrError};
use crate::models::{TransactionResult, TransactionResultCode};
use crate::services::provider::ProviderError;
use thiserror::Error;

/// Errors surfaced by the submission client.
///
/// `Rejected` carries the decoded ledger result so callers can inspect the
/// transaction-level code and every per-operation code.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Transaction rejected by the network: {code:?}")]
    Rejected {
        code: TransactionResultCode,
        result: Box<TransactionResult>,
        envelope_xdr: String,
    },

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid result XDR: {0}")]
    InvalidResult(#[from] XdrError),

    #[error("Invalid value: {0}")]
    Value(#[from] ValueError),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl SubmissionError {
    /// Returns the decoded ledger result when the network rejected the transaction.
    pub fn result(&self) -> Option<&TransactionResult> {
        match self {
            SubmissionError::Rejected { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Determines if this error is transient (can retry) or permanent.
    ///
    /// Only transport failures can be transient; ledger rejections and
    /// local build errors never resolve by resubmitting the same envelope.
    pub fn is_transient(&self) -> bool {
        match self {
            SubmissionError::Provider(err) => err.is_transient(),
            SubmissionError::Rejected { .. }
            | SubmissionError::AccountNotFound(_)
            | SubmissionError::Transaction(_)
            | SubmissionError::InvalidResult(_)
            | SubmissionError::Value(_)
            | SubmissionError::UnexpectedResponse(_) => false,
        }
    }
}
