use serde::Deserialize;

use crate::models::{Amount, Asset, HorizonAsset, Price, ValueError};

#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookResponse {
    #[serde(default)]
    pub bids: Vec<OrderBookLevelResponse>,
    #[serde(default)]
    pub asks: Vec<OrderBookLevelResponse>,
    pub base: HorizonAsset,
    pub counter: HorizonAsset,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderBookLevelResponse {
    pub price_r: Price,
    pub price: String,
    pub amount: String,
}

/// Aggregated depth at one price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBookLevel {
    pub price: Price,
    pub amount: Amount,
}

/// Bids and asks for a selling/buying pair. Horizon returns bids best-first
/// (highest price) and asks best-first (lowest price).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    pub base: Asset,
    pub counter: Asset,
    pub bids: Vec<OrderBookLevel>,
    pub asks: Vec<OrderBookLevel>,
}

impl OrderBook {
    pub fn best_bid(&self) -> Option<&OrderBookLevel> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookLevel> {
        self.asks.first()
    }

    /// Midpoint of the best bid and ask, if both sides have depth.
    pub fn mid_price(&self) -> Option<f64> {
        let bid = self.best_bid()?.price.to_f64();
        let ask = self.best_ask()?.price.to_f64();
        Some((bid + ask) / 2.0)
    }
}

fn levels(raw: Vec<OrderBookLevelResponse>) -> Result<Vec<OrderBookLevel>, ValueError> {
    raw.into_iter()
        .map(|level| {
            Ok(OrderBookLevel {
                price: level.price_r,
                amount: level.amount.parse()?,
            })
        })
        .collect()
}

impl TryFrom<OrderBookResponse> for OrderBook {
    type Error = ValueError;

    fn try_from(raw: OrderBookResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            base: raw.base.to_asset()?,
            counter: raw.counter.to_asset()?,
            bids: levels(raw.bids)?,
            asks: levels(raw.asks)?,
        })
    }
}
