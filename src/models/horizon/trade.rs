use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{AccountId, Amount, Asset, HorizonLink, Price, ValueError};

use super::{parse_id, parse_timestamp};

/// Raw trade record from `trades`, `accounts/{id}/trades` and
/// `offers/{id}/trades`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeResponse {
    pub id: String,
    pub paging_token: String,
    pub ledger_close_time: String,
    #[serde(default)]
    pub offer_id: Option<String>,
    #[serde(default)]
    pub base_offer_id: Option<String>,
    #[serde(default)]
    pub base_account: Option<String>,
    pub base_amount: String,
    pub base_asset_type: String,
    #[serde(default)]
    pub base_asset_code: Option<String>,
    #[serde(default)]
    pub base_asset_issuer: Option<String>,
    #[serde(default)]
    pub counter_offer_id: Option<String>,
    #[serde(default)]
    pub counter_account: Option<String>,
    pub counter_amount: String,
    pub counter_asset_type: String,
    #[serde(default)]
    pub counter_asset_code: Option<String>,
    #[serde(default)]
    pub counter_asset_issuer: Option<String>,
    pub base_is_seller: bool,
    pub price: Price,
    #[serde(rename = "_links", default)]
    pub links: TradeLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TradeLinks {
    #[serde(default)]
    pub operation: Option<HorizonLink>,
}

/// A fill on the built-in exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub id: String,
    pub paging_token: String,
    pub offer_id: Option<i64>,
    pub ledger_close_time: DateTime<Utc>,
    pub base_account: Option<AccountId>,
    pub base_amount: Amount,
    pub base_asset: Asset,
    pub counter_offer_id: Option<i64>,
    pub counter_account: Option<AccountId>,
    pub counter_amount: Amount,
    pub counter_asset: Asset,
    pub base_is_seller: bool,
    pub price: Price,
    /// Id of the operation that produced the trade, when linked.
    pub operation_id: Option<i64>,
}

fn parse_optional_id(field: &str, value: Option<&str>) -> Result<Option<i64>, ValueError> {
    value.map(|v| parse_id(field, v)).transpose()
}

fn parse_optional_account(value: Option<&str>) -> Result<Option<AccountId>, ValueError> {
    value
        .map(|address| {
            AccountId::from_address(address)
                .map_err(|e| ValueError::InvalidRecord(format!("account '{}': {}", address, e)))
        })
        .transpose()
}

impl TryFrom<TradeResponse> for Trade {
    type Error = ValueError;

    fn try_from(raw: TradeResponse) -> Result<Self, Self::Error> {
        let operation_id = raw
            .links
            .operation
            .as_ref()
            .and_then(|link| link.href.trim_end_matches('/').rsplit('/').next())
            .map(|segment| parse_id("operation", segment))
            .transpose()?;

        Ok(Self {
            offer_id: parse_optional_id(
                "offer_id",
                raw.offer_id.as_deref().or(raw.base_offer_id.as_deref()),
            )?,
            ledger_close_time: parse_timestamp("ledger_close_time", &raw.ledger_close_time)?,
            base_account: parse_optional_account(raw.base_account.as_deref())?,
            base_amount: raw.base_amount.parse()?,
            base_asset: Asset::from_horizon(
                &raw.base_asset_type,
                raw.base_asset_code.as_deref(),
                raw.base_asset_issuer.as_deref(),
            )?,
            counter_offer_id: parse_optional_id("counter_offer_id", raw.counter_offer_id.as_deref())?,
            counter_account: parse_optional_account(raw.counter_account.as_deref())?,
            counter_amount: raw.counter_amount.parse()?,
            counter_asset: Asset::from_horizon(
                &raw.counter_asset_type,
                raw.counter_asset_code.as_deref(),
                raw.counter_asset_issuer.as_deref(),
            )?,
            base_is_seller: raw.base_is_seller,
            price: raw.price,
            operation_id,
            id: raw.id,
            paging_token: raw.paging_token,
        })
    }
}

#[cfg(test)]
pub(crate) const TRADE_JSON: &str = r#"{
    "_links": {
        "self": {"href": ""},
        "base": {"href": "https://horizon.stellar.org/accounts/GCILEORWFS6PKGCXUVC73TKTPPHXADNQFLVGKVWLAW4FJJTCXNE6DGB7"},
        "operation": {"href": "https://horizon.stellar.org/operations/107449584845914113"}
    },
    "id": "107449584845914113-0",
    "paging_token": "107449584845914113-0",
    "ledger_close_time": "2019-07-26T09:17:02Z",
    "offer_id": "104078276",
    "base_offer_id": "104078276",
    "base_account": "GCILEORWFS6PKGCXUVC73TKTPPHXADNQFLVGKVWLAW4FJJTCXNE6DGB7",
    "base_amount": "9.8728614",
    "base_asset_type": "native",
    "counter_offer_id": "4710550934311165953",
    "counter_account": "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF",
    "counter_amount": "0.2070182",
    "counter_asset_type": "credit_alphanum4",
    "counter_asset_code": "SLT",
    "counter_asset_issuer": "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF",
    "base_is_seller": true,
    "price": {"n": 152, "d": 7249}
}"#;
