use std::fmt;

use crate::{
    constants::STELLAR_DEFAULT_TRUST_LIMIT,
    models::{Amount, Asset, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Opens, resizes or (with a zero limit) removes a trust line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTrustOp {
    pub line: Asset,
    pub limit: Amount,
}

impl ChangeTrustOp {
    /// Trust line with the largest representable limit.
    pub fn unlimited(line: Asset) -> Self {
        Self {
            line,
            limit: Amount::from_stroops(STELLAR_DEFAULT_TRUST_LIMIT),
        }
    }
}

impl fmt::Display for ChangeTrustOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trust {} up to {}", self.line, self.limit)
    }
}

impl XdrEncode for ChangeTrustOp {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.line.encode(writer)?;
        self.limit.encode(writer)
    }
}

impl XdrDecode for ChangeTrustOp {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            line: Asset::decode(reader)?,
            limit: Amount::decode(reader)?,
        })
    }
}
