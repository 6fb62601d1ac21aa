use std::collections::BTreeMap;

use serde::Deserialize;

use crate::utils::deserialize_i64;

/// `GET accounts/{id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountResponse {
    pub account_id: String,
    #[serde(deserialize_with = "deserialize_i64")]
    pub sequence: i64,
    #[serde(default)]
    pub subentry_count: u32,
    #[serde(default)]
    pub thresholds: Option<ThresholdsResponse>,
    #[serde(default)]
    pub balances: Vec<BalanceResponse>,
    #[serde(default)]
    pub signers: Vec<SignerResponse>,
    /// Data entries, values base64-encoded.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsResponse {
    pub low_threshold: u8,
    pub med_threshold: u8,
    pub high_threshold: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub balance: String,
    pub limit: Option<String>,
    pub buying_liabilities: Option<String>,
    pub selling_liabilities: Option<String>,
    pub last_modified_ledger: Option<u32>,
    pub asset_type: String,
    pub asset_code: Option<String>,
    pub asset_issuer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignerResponse {
    pub key: String,
    pub weight: u32,
    #[serde(rename = "type", default)]
    pub signer_type: Option<String>,
}
