use serde::Deserialize;

use crate::{
    models::{AccountId, Amount, Asset, HorizonAsset, Price, Trade, ValueError},
    utils::deserialize_i64,
};

/// Raw open-offer record from `accounts/{id}/offers`.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferResponse {
    #[serde(deserialize_with = "deserialize_i64")]
    pub id: i64,
    #[serde(default)]
    pub paging_token: Option<String>,
    pub seller: String,
    pub selling: HorizonAsset,
    pub buying: HorizonAsset,
    pub amount: String,
    #[serde(default)]
    pub price_r: Option<Price>,
    pub price: String,
    #[serde(default)]
    pub last_modified_ledger: Option<u32>,
}

/// A standing offer owned by an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub id: i64,
    pub paging_token: Option<String>,
    pub seller: AccountId,
    pub selling: Asset,
    pub buying: Asset,
    /// Remaining amount of the selling asset.
    pub amount: Amount,
    pub price: Price,
    pub last_modified_ledger: Option<u32>,
}

impl TryFrom<OfferResponse> for Offer {
    type Error = ValueError;

    fn try_from(raw: OfferResponse) -> Result<Self, Self::Error> {
        let price = match raw.price_r {
            Some(price) => price,
            None => {
                let value: f64 = raw.price.trim().parse().map_err(|_| {
                    ValueError::InvalidPrice(format!("offer price '{}' is not a number", raw.price))
                })?;
                Price::from_f64(value)?
            }
        };

        Ok(Self {
            id: raw.id,
            paging_token: raw.paging_token,
            seller: AccountId::from_address(&raw.seller)
                .map_err(|e| ValueError::InvalidRecord(format!("seller '{}': {}", raw.seller, e)))?,
            selling: raw.selling.to_asset()?,
            buying: raw.buying.to_asset()?,
            amount: raw.amount.parse()?,
            price,
            last_modified_ledger: raw.last_modified_ledger,
        })
    }
}

/// Fills recorded against one offer, and whether it is still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferStatus {
    pub offer_id: i64,
    pub trades: Vec<Trade>,
    pub is_open: bool,
}

impl OfferStatus {
    /// Total amount of the offer's selling side filled so far.
    pub fn filled_amount(&self) -> Amount {
        self.trades
            .iter()
            .map(|trade| {
                // the base side always delivers the base asset
                if trade.offer_id == Some(self.offer_id) {
                    trade.base_amount
                } else {
                    trade.counter_amount
                }
            })
            .fold(Amount::ZERO, |total, amount| {
                total.checked_add(amount).unwrap_or(Amount::MAX)
            })
    }
}

#[cfg(test)]
pub(crate) const OFFER_JSON: &str = r#"{
    "_links": {"self": {"href": "https://horizon.stellar.org/offers/104078276"}},
    "id": "104078276",
    "paging_token": "104078276",
    "seller": "GCILEORWFS6PKGCXUVC73TKTPPHXADNQFLVGKVWLAW4FJJTCXNE6DGB7",
    "selling": {"asset_type": "native"},
    "buying": {
        "asset_type": "credit_alphanum4",
        "asset_code": "SLT",
        "asset_issuer": "GCKA6K5PCQ6PNF5RQBF7PQDJWRHO6UOGFMRLK3DYHDOI244V47XKQ4GP"
    },
    "amount": "90.1271386",
    "price_r": {"n": 152, "d": 7249},
    "price": "0.0209684",
    "last_modified_ledger": 25016831
}"#;
