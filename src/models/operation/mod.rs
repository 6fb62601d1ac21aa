//! Transaction operations.
//!
//! Every operation on the wire is an optional source-account override, the
//! operation type tag and the type's payload. Decoding dispatches on the tag;
//! tags the client does not model fail with
//! [`XdrError::UnsupportedOperation`].

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::Display;

use crate::{
    models::{AccountId, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

mod create_account;
pub use create_account::*;

mod payment;
pub use payment::*;

mod manage_offer;
pub use manage_offer::*;

mod change_trust;
pub use change_trust::*;

mod allow_trust;
pub use allow_trust::*;

/// Every operation tag of the network protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
#[strum(serialize_all = "snake_case")]
pub enum OperationType {
    CreateAccount = 0,
    Payment = 1,
    PathPayment = 2,
    /// Also the tag of the legacy "manage offer" operation.
    ManageSellOffer = 3,
    CreatePassiveOffer = 4,
    SetOptions = 5,
    ChangeTrust = 6,
    AllowTrust = 7,
    AccountMerge = 8,
    Inflation = 9,
    ManageData = 10,
    BumpSequence = 11,
    ManageBuyOffer = 12,
}

impl OperationType {
    pub(crate) fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let value = reader.read_i32()?;
        OperationType::try_from(value).map_err(|_| XdrError::InvalidDiscriminant {
            kind: "OperationType",
            value,
        })
    }
}

/// Payload of the operations this client builds and decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationBody {
    CreateAccount(CreateAccountOp),
    Payment(PaymentOp),
    ManageSellOffer(ManageSellOfferOp),
    ManageBuyOffer(ManageBuyOfferOp),
    ChangeTrust(ChangeTrustOp),
    AllowTrust(AllowTrustOp),
}

impl OperationBody {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationBody::CreateAccount(_) => OperationType::CreateAccount,
            OperationBody::Payment(_) => OperationType::Payment,
            OperationBody::ManageSellOffer(_) => OperationType::ManageSellOffer,
            OperationBody::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            OperationBody::ChangeTrust(_) => OperationType::ChangeTrust,
            OperationBody::AllowTrust(_) => OperationType::AllowTrust,
        }
    }

    fn encode_payload(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        match self {
            OperationBody::CreateAccount(op) => op.encode(writer),
            OperationBody::Payment(op) => op.encode(writer),
            OperationBody::ManageSellOffer(op) => op.encode(writer),
            OperationBody::ManageBuyOffer(op) => op.encode(writer),
            OperationBody::ChangeTrust(op) => op.encode(writer),
            OperationBody::AllowTrust(op) => op.encode(writer),
        }
    }

    fn decode_payload(
        operation_type: OperationType,
        reader: &mut XdrReader<'_>,
    ) -> Result<Self, XdrError> {
        Ok(match operation_type {
            OperationType::CreateAccount => {
                OperationBody::CreateAccount(CreateAccountOp::decode(reader)?)
            }
            OperationType::Payment => OperationBody::Payment(PaymentOp::decode(reader)?),
            OperationType::ManageSellOffer => {
                OperationBody::ManageSellOffer(ManageSellOfferOp::decode(reader)?)
            }
            OperationType::ManageBuyOffer => {
                OperationBody::ManageBuyOffer(ManageBuyOfferOp::decode(reader)?)
            }
            OperationType::ChangeTrust => OperationBody::ChangeTrust(ChangeTrustOp::decode(reader)?),
            OperationType::AllowTrust => OperationBody::AllowTrust(AllowTrustOp::decode(reader)?),
            other => return Err(XdrError::UnsupportedOperation(other.into())),
        })
    }
}

impl fmt::Display for OperationBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationBody::CreateAccount(op) => op.fmt(f),
            OperationBody::Payment(op) => op.fmt(f),
            OperationBody::ManageSellOffer(op) => op.fmt(f),
            OperationBody::ManageBuyOffer(op) => op.fmt(f),
            OperationBody::ChangeTrust(op) => op.fmt(f),
            OperationBody::AllowTrust(op) => op.fmt(f),
        }
    }
}

macro_rules! impl_from_op {
    ($($op:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$op> for OperationBody {
                fn from(op: $op) -> Self {
                    OperationBody::$variant(op)
                }
            }
        )*
    };
}

impl_from_op!(
    CreateAccountOp => CreateAccount,
    PaymentOp => Payment,
    ManageSellOfferOp => ManageSellOffer,
    ManageBuyOfferOp => ManageBuyOffer,
    ChangeTrustOp => ChangeTrust,
    AllowTrustOp => AllowTrust,
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Account the operation acts on; the transaction source when `None`.
    pub source_account: Option<AccountId>,
    pub body: OperationBody,
}

impl Operation {
    pub fn new(body: impl Into<OperationBody>) -> Self {
        Self {
            source_account: None,
            body: body.into(),
        }
    }

    pub fn with_source(mut self, source_account: AccountId) -> Self {
        self.source_account = Some(source_account);
        self
    }

    pub fn operation_type(&self) -> OperationType {
        self.body.operation_type()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.operation_type(), self.body)?;
        if let Some(source) = &self.source_account {
            write!(f, " (source {})", source)?;
        }
        Ok(())
    }
}

impl XdrEncode for Operation {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_optional(self.source_account.as_ref())?;
        writer.write_i32(self.operation_type().into());
        self.body.encode_payload(writer)
    }
}

impl XdrDecode for Operation {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let source_account = reader.read_optional::<AccountId>()?;
        let value = reader.read_i32()?;
        let operation_type =
            OperationType::try_from(value).map_err(|_| XdrError::UnsupportedOperation(value))?;
        let body = OperationBody::decode_payload(operation_type, reader)?;
        Ok(Self {
            source_account,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Asset, Price};

    const ISSUER: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

    fn issuer() -> AccountId {
        ISSUER.parse().unwrap()
    }

    fn usd() -> Asset {
        Asset::credit("USD", issuer()).unwrap()
    }

    fn corpus() -> Vec<Operation> {
        vec![
            Operation::new(CreateAccountOp {
                destination: AccountId::from_bytes([3u8; 32]),
                starting_balance: "1.5".parse().unwrap(),
            }),
            Operation::new(PaymentOp {
                destination: issuer(),
                asset: usd(),
                amount: Amount::ZERO,
            }),
            Operation::new(ManageSellOfferOp {
                selling: Asset::Native,
                buying: Asset::credit("LONGASSETNME", issuer()).unwrap(),
                amount: "100.5".parse().unwrap(),
                price: Price::new(2129193, 10000000).unwrap(),
                offer_id: 0,
            })
            .with_source(AccountId::from_bytes([9u8; 32])),
            Operation::new(ManageBuyOfferOp {
                selling: usd(),
                buying: Asset::Native,
                buy_amount: "3".parse().unwrap(),
                price: Price::new(1, 3).unwrap(),
                offer_id: u64::MAX,
            }),
            Operation::new(ChangeTrustOp::unlimited(usd())),
            Operation::new(AllowTrustOp {
                trustor: AccountId::from_bytes([5u8; 32]),
                asset_code: "EURTOKEN".to_string(),
                authorize: TRUST_LINE_AUTHORIZED,
            }),
        ]
    }

    #[test]
    fn test_round_trip_corpus() {
        for operation in corpus() {
            let bytes = operation.to_xdr().unwrap();
            let decoded = Operation::from_xdr(&bytes).unwrap();
            assert_eq!(decoded, operation, "round trip of {}", operation);
        }
    }

    #[test]
    fn test_envelope_prefix() {
        let operation = Operation::new(ChangeTrustOp::unlimited(usd()));
        let bytes = operation.to_xdr().unwrap();
        // no source override, then tag 6
        assert_eq!(&bytes[..8], &[0, 0, 0, 0, 0, 0, 0, 6]);

        let with_source = operation.with_source(issuer()).to_xdr().unwrap();
        assert_eq!(&with_source[..4], &[0, 0, 0, 1]);
        assert_eq!(&with_source[40..44], &[0, 0, 0, 6]);
    }

    #[test]
    fn test_manage_offer_payload_layout() {
        let operation = Operation::new(ManageSellOfferOp {
            selling: Asset::Native,
            buying: Asset::Native,
            amount: Amount::from_stroops(1),
            price: Price::new(1, 2).unwrap(),
            offer_id: 7,
        });
        let bytes = operation.to_xdr().unwrap();
        let expected: Vec<u8> = [
            &[0u8, 0, 0, 0][..],        // no source
            &[0, 0, 0, 3],              // manage sell offer
            &[0, 0, 0, 0],              // native
            &[0, 0, 0, 0],              // native
            &1i64.to_be_bytes(),        // amount
            &[0, 0, 0, 1, 0, 0, 0, 2],  // price
            &7u64.to_be_bytes(),        // offer id
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_unimplemented_operation_type() {
        // set options (5) is a known tag without a payload model
        let bytes = [0, 0, 0, 0, 0, 0, 0, 5];
        assert_eq!(
            Operation::from_xdr(&bytes),
            Err(XdrError::UnsupportedOperation(5))
        );
    }

    #[test]
    fn test_unknown_operation_type() {
        let bytes = [0, 0, 0, 0, 0, 0, 0, 99];
        assert_eq!(
            Operation::from_xdr(&bytes),
            Err(XdrError::UnsupportedOperation(99))
        );
    }

    #[test]
    fn test_truncated_payload() {
        let bytes = Operation::new(ChangeTrustOp::unlimited(usd())).to_xdr().unwrap();
        assert!(matches!(
            Operation::from_xdr(&bytes[..bytes.len() - 3]),
            Err(XdrError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_cancel_detection() {
        let cancel = ManageSellOfferOp::cancel(Asset::Native, usd(), Price::new(1, 1).unwrap(), 42);
        assert!(cancel.is_cancel());
        let create = ManageSellOfferOp { offer_id: 0, ..cancel };
        assert!(!create.is_cancel());
    }

    #[test]
    fn test_display() {
        let operation = Operation::new(ChangeTrustOp::unlimited(usd()));
        assert_eq!(
            operation.to_string(),
            format!("[change_trust] trust USD:{} up to 922337203685.4775807", ISSUER)
        );
        assert_eq!(OperationType::ManageBuyOffer.to_string(), "manage_buy_offer");
    }
}
