use std::fmt;

use crate::{
    models::{AccountId, Amount, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Creates and funds a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountOp {
    pub destination: AccountId,
    pub starting_balance: Amount,
}

impl fmt::Display for CreateAccountOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "create account {} with {}",
            self.destination, self.starting_balance
        )
    }
}

impl XdrEncode for CreateAccountOp {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.destination.encode(writer)?;
        self.starting_balance.encode(writer)
    }
}

impl XdrDecode for CreateAccountOp {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            destination: AccountId::decode(reader)?,
            starting_balance: Amount::decode(reader)?,
        })
    }
}
