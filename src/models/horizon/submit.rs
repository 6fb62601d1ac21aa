use serde::Deserialize;

use crate::models::{TransactionResult, XdrError};
use crate::xdr::XdrDecode;

/// Successful `POST transactions` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTransactionResponse {
    pub hash: String,
    pub ledger: u32,
    pub envelope_xdr: String,
    pub result_xdr: String,
}

/// An accepted transaction with its decoded result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedTransaction {
    pub hash: String,
    pub ledger: u32,
    pub envelope_xdr: String,
    pub result: TransactionResult,
}

impl TryFrom<SubmitTransactionResponse> for SubmittedTransaction {
    type Error = XdrError;

    fn try_from(raw: SubmitTransactionResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            result: TransactionResult::from_xdr_base64(&raw.result_xdr)?,
            hash: raw.hash,
            ledger: raw.ledger,
            envelope_xdr: raw.envelope_xdr,
        })
    }
}

/// Problem document Horizon returns with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct HorizonErrorResponse {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub extras: Option<HorizonErrorExtras>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorizonErrorExtras {
    #[serde(default)]
    pub envelope_xdr: Option<String>,
    #[serde(default)]
    pub result_xdr: Option<String>,
    #[serde(default)]
    pub result_codes: Option<HorizonResultCodes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HorizonResultCodes {
    #[serde(default)]
    pub transaction: Option<String>,
    #[serde(default)]
    pub operations: Vec<String>,
}

impl HorizonErrorResponse {
    /// Result XDR of a rejected transaction, if the body carries one.
    pub fn result_xdr(&self) -> Option<&str> {
        self.extras.as_ref()?.result_xdr.as_deref()
    }
}
