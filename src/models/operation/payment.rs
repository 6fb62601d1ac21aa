use std::fmt;

use crate::{
    models::{AccountId, Amount, Asset, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOp {
    pub destination: AccountId,
    pub asset: Asset,
    pub amount: Amount,
}

impl fmt::Display for PaymentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pay {} {} to {}", self.amount, self.asset, self.destination)
    }
}

impl XdrEncode for PaymentOp {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.destination.encode(writer)?;
        self.asset.encode(writer)?;
        self.amount.encode(writer)
    }
}

impl XdrDecode for PaymentOp {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            destination: AccountId::decode(reader)?,
            asset: Asset::decode(reader)?,
            amount: Amount::decode(reader)?,
        })
    }
}
