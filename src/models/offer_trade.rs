//! Outcome of placing, updating or cancelling an offer.

use std::fmt;

use crate::models::{
    Amount, Asset, ClaimOfferAtom, ManageOfferEffect, ManageSellOfferOp, Price,
    SubmittedTransaction,
};

/// Direction of an offer from the account's point of view: spending the
/// native asset is a buy, anything else is a sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OfferSide {
    Buy,
    Sell,
}

impl OfferSide {
    pub fn for_selling(selling: &Asset) -> Self {
        if selling.is_native() {
            OfferSide::Buy
        } else {
            OfferSide::Sell
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferTrade {
    pub side: OfferSide,
    /// Id of the resulting open offer; `None` when fully filled or deleted.
    pub offer_id: Option<u64>,
    pub claimed: Vec<ClaimOfferAtom>,
    pub price: Price,
    pub sell_amount: Amount,
    pub fee_charged: Amount,
    pub hash: String,
    pub envelope_xdr: String,
}

impl OfferTrade {
    /// Builds the outcome from the submitted offer operation and the accepted
    /// transaction. Returns `None` when the transaction has no successful
    /// manage-offer result.
    pub fn from_submission(
        operation: &ManageSellOfferOp,
        submitted: &SubmittedTransaction,
    ) -> Option<Self> {
        let success = submitted.result.offer_success()?;
        let offer_id = match &success.effect {
            ManageOfferEffect::Created(entry) | ManageOfferEffect::Updated(entry) => {
                Some(entry.offer_id)
            }
            ManageOfferEffect::Deleted => None,
        };

        Some(Self {
            side: OfferSide::for_selling(&operation.selling),
            offer_id,
            claimed: success.offers_claimed.clone(),
            price: operation.price,
            sell_amount: operation.amount,
            fee_charged: submitted.result.fee_charged,
            hash: submitted.hash.clone(),
            envelope_xdr: submitted.envelope_xdr.clone(),
        })
    }

    pub fn is_open(&self) -> bool {
        self.offer_id.is_some()
    }

    /// Total of the selling asset already filled against other offers.
    pub fn claimed_amount(&self) -> Amount {
        self.claimed.iter().fold(Amount::ZERO, |total, atom| {
            total.checked_add(atom.amount_bought).unwrap_or(Amount::MAX)
        })
    }
}

impl fmt::Display for OfferTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at {} ({} claimed, fee {}, tx {})",
            self.side,
            self.sell_amount,
            self.price,
            self.claimed.len(),
            self.fee_charged,
            self.hash
        )?;
        if let Some(offer_id) = self.offer_id {
            write!(f, " offer {}", offer_id)?;
        }
        Ok(())
    }
}
