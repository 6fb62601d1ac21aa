//! Offers on the built-in exchange.
//!
//! An `offer_id` of zero creates a new offer; a non-zero id updates that
//! offer, and an update with a zero amount deletes it.

use std::fmt;

use crate::{
    models::{Amount, Asset, Price, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Sells `amount` of `selling` for `buying` at `price` (buying per selling).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageSellOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub amount: Amount,
    pub price: Price,
    pub offer_id: u64,
}

/// Buys `buy_amount` of `buying` with `selling` at `price` (selling per buying).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageBuyOfferOp {
    pub selling: Asset,
    pub buying: Asset,
    pub buy_amount: Amount,
    pub price: Price,
    pub offer_id: u64,
}

impl ManageSellOfferOp {
    /// Update that removes an existing offer.
    pub fn cancel(selling: Asset, buying: Asset, price: Price, offer_id: u64) -> Self {
        Self {
            selling,
            buying,
            amount: Amount::ZERO,
            price,
            offer_id,
        }
    }

    pub fn is_cancel(&self) -> bool {
        self.offer_id != 0 && self.amount.is_zero()
    }
}

impl ManageBuyOfferOp {
    pub fn is_cancel(&self) -> bool {
        self.offer_id != 0 && self.buy_amount.is_zero()
    }
}

fn offer_label(offer_id: u64) -> String {
    if offer_id == 0 {
        "new offer".to_string()
    } else {
        format!("offer {}", offer_id)
    }
}

impl fmt::Display for ManageSellOfferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: sell {} {} for {} at {}",
            offer_label(self.offer_id),
            self.amount,
            self.selling,
            self.buying,
            self.price
        )
    }
}

impl fmt::Display for ManageBuyOfferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: buy {} {} with {} at {}",
            offer_label(self.offer_id),
            self.buy_amount,
            self.buying,
            self.selling,
            self.price
        )
    }
}

impl XdrEncode for ManageSellOfferOp {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.selling.encode(writer)?;
        self.buying.encode(writer)?;
        self.amount.encode(writer)?;
        self.price.encode(writer)?;
        writer.write_u64(self.offer_id);
        Ok(())
    }
}

impl XdrDecode for ManageSellOfferOp {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            selling: Asset::decode(reader)?,
            buying: Asset::decode(reader)?,
            amount: Amount::decode(reader)?,
            price: Price::decode(reader)?,
            offer_id: reader.read_u64()?,
        })
    }
}

impl XdrEncode for ManageBuyOfferOp {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.selling.encode(writer)?;
        self.buying.encode(writer)?;
        self.buy_amount.encode(writer)?;
        self.price.encode(writer)?;
        writer.write_u64(self.offer_id);
        Ok(())
    }
}

impl XdrDecode for ManageBuyOfferOp {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            selling: Asset::decode(reader)?,
            buying: Asset::decode(reader)?,
            buy_amount: Amount::decode(reader)?,
            price: Price::decode(reader)?,
            offer_id: reader.read_u64()?,
        })
    }
}
