//! Horizon transport.
//!
//! [`HorizonProviderTrait`] is the seam every network-facing service depends
//! on; [`HorizonProvider`] implements it over `reqwest`.

use thiserror::Error;

use crate::models::HorizonErrorResponse;

mod horizon;
pub use horizon::*;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network configuration error: {0}")]
    NetworkConfiguration(String),
    #[error("Request timeout")]
    Timeout,
    #[error("Rate limited (HTTP 429)")]
    RateLimited,
    #[error("Bad gateway (HTTP 502)")]
    BadGateway,
    #[error("Server error (HTTP {status_code}): {message}")]
    ServerError { status_code: u16, message: String },
    #[error("Request error (HTTP {status_code}): {error}")]
    RequestError { error: String, status_code: u16 },
    #[error("Transaction rejected (HTTP {status_code})")]
    TransactionRejected {
        status_code: u16,
        body: Box<HorizonErrorResponse>,
    },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Other provider error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Determines if this error is transient (can retry) or permanent (should fail).
    pub fn is_transient(&self) -> bool {
        is_retriable_error(self)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::RateLimited => Some(429),
            ProviderError::BadGateway => Some(502),
            ProviderError::ServerError { status_code, .. }
            | ProviderError::RequestError { status_code, .. }
            | ProviderError::TransactionRejected { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Categorizes a reqwest error into an appropriate `ProviderError` variant.
///
/// - Timeout errors become `ProviderError::Timeout`
/// - HTTP 429 responses become `ProviderError::RateLimited`
/// - HTTP 502 responses become `ProviderError::BadGateway`
/// - Other 5xx responses become `ProviderError::ServerError`
/// - Other statuses become `ProviderError::RequestError`
/// - Connection failures become `ProviderError::TransportError`
fn categorize_reqwest_error(err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        return ProviderError::Timeout;
    }

    if let Some(status) = err.status() {
        return categorize_status(status.as_u16(), err.to_string());
    }

    if err.is_connect() || err.is_request() || err.is_body() {
        return ProviderError::TransportError(err.to_string());
    }

    if err.is_decode() {
        return ProviderError::InvalidResponse(err.to_string());
    }

    ProviderError::Other(err.to_string())
}

fn categorize_status(status_code: u16, message: String) -> ProviderError {
    match status_code {
        429 => ProviderError::RateLimited,
        502 => ProviderError::BadGateway,
        500..=599 => ProviderError::ServerError {
            status_code,
            message,
        },
        _ => ProviderError::RequestError {
            error: message,
            status_code,
        },
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        categorize_reqwest_error(&err)
    }
}

impl From<&reqwest::Error> for ProviderError {
    fn from(err: &reqwest::Error) -> Self {
        categorize_reqwest_error(err)
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::InvalidResponse(err.to_string())
    }
}

// Errors that are retriable
pub fn is_retriable_error(error: &ProviderError) -> bool {
    match error {
        ProviderError::Timeout
        | ProviderError::RateLimited
        | ProviderError::BadGateway
        | ProviderError::TransportError(_) => true,

        ProviderError::ServerError { status_code, .. } => {
            // Not Implemented, HTTP Version Not Supported
            !matches!(*status_code, 501 | 505)
        }

        ProviderError::RequestError { status_code, .. } => {
            matches!(*status_code, 408 | 425 | 429)
        }

        ProviderError::TransactionRejected { .. }
        | ProviderError::NetworkConfiguration(_)
        | ProviderError::InvalidResponse(_) => false,

        ProviderError::Other(message) => {
            let msg_lower = message.to_lowercase();
            msg_lower.contains("timeout")
                || msg_lower.contains("connection")
                || msg_lower.contains("reset")
        }
    }
}
