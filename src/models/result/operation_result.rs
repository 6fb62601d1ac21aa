use std::fmt;

use crate::{
    models::{
        AllowTrustResultCode, ChangeTrustResultCode, CreateAccountResultCode, ManageOfferResult,
        ManageOfferResultCode, OperationResultCode, OperationType, PaymentResultCode, XdrError,
    },
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Side of an offer whose asset the account has no trust line for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingTrust {
    Selling,
    Buying,
}

/// Type-specific result of an operation that ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationInnerResult {
    CreateAccount(CreateAccountResultCode),
    Payment(PaymentResultCode),
    ManageSellOffer(ManageOfferResult),
    ManageBuyOffer(ManageOfferResult),
    ChangeTrust(ChangeTrustResultCode),
    AllowTrust(AllowTrustResultCode),
}

impl OperationInnerResult {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationInnerResult::CreateAccount(_) => OperationType::CreateAccount,
            OperationInnerResult::Payment(_) => OperationType::Payment,
            OperationInnerResult::ManageSellOffer(_) => OperationType::ManageSellOffer,
            OperationInnerResult::ManageBuyOffer(_) => OperationType::ManageBuyOffer,
            OperationInnerResult::ChangeTrust(_) => OperationType::ChangeTrust,
            OperationInnerResult::AllowTrust(_) => OperationType::AllowTrust,
        }
    }

    /// Numeric result code of the operation (zero on success).
    pub fn code(&self) -> i32 {
        match self {
            OperationInnerResult::CreateAccount(code) => code.code(),
            OperationInnerResult::Payment(code) => code.code(),
            OperationInnerResult::ManageSellOffer(result)
            | OperationInnerResult::ManageBuyOffer(result) => result.code().code(),
            OperationInnerResult::ChangeTrust(code) => code.code(),
            OperationInnerResult::AllowTrust(code) => code.code(),
        }
    }

    pub fn code_name(&self) -> &'static str {
        match self {
            OperationInnerResult::CreateAccount(code) => code.name(),
            OperationInnerResult::Payment(code) => code.name(),
            OperationInnerResult::ManageSellOffer(result)
            | OperationInnerResult::ManageBuyOffer(result) => result.code().name(),
            OperationInnerResult::ChangeTrust(code) => code.name(),
            OperationInnerResult::AllowTrust(code) => code.name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Inner(OperationInnerResult),
    /// The operation never ran; only the envelope code is present.
    Failed(OperationResultCode),
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Inner(inner) if inner.code() == 0)
    }

    pub fn manage_offer(&self) -> Option<&ManageOfferResult> {
        match self {
            OperationResult::Inner(OperationInnerResult::ManageSellOffer(result))
            | OperationResult::Inner(OperationInnerResult::ManageBuyOffer(result)) => Some(result),
            _ => None,
        }
    }

    /// The missing trust line behind a failed manage-offer operation.
    pub fn missing_trust(&self) -> Option<MissingTrust> {
        match self.manage_offer()?.code() {
            ManageOfferResultCode::SellNoTrust => Some(MissingTrust::Selling),
            ManageOfferResultCode::BuyNoTrust => Some(MissingTrust::Buying),
            _ => None,
        }
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationResult::Failed(code) => write!(f, "{}", code),
            OperationResult::Inner(OperationInnerResult::ManageSellOffer(result))
            | OperationResult::Inner(OperationInnerResult::ManageBuyOffer(result)) => {
                write!(f, "[manage offer] {}", result)
            }
            OperationResult::Inner(inner) => {
                write!(f, "[{}] {}", inner.operation_type(), inner.code_name())
            }
        }
    }
}

impl XdrEncode for OperationResult {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        match self {
            OperationResult::Failed(code) => code.encode(writer),
            OperationResult::Inner(inner) => {
                OperationResultCode::Inner.encode(writer)?;
                writer.write_i32(inner.operation_type().into());
                match inner {
                    OperationInnerResult::CreateAccount(code) => code.encode(writer),
                    OperationInnerResult::Payment(code) => code.encode(writer),
                    OperationInnerResult::ManageSellOffer(result)
                    | OperationInnerResult::ManageBuyOffer(result) => result.encode(writer),
                    OperationInnerResult::ChangeTrust(code) => code.encode(writer),
                    OperationInnerResult::AllowTrust(code) => code.encode(writer),
                }
            }
        }
    }
}

impl XdrDecode for OperationResult {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let code = OperationResultCode::decode(reader)?;
        if code != OperationResultCode::Inner {
            return Ok(OperationResult::Failed(code));
        }

        let value = reader.read_i32()?;
        let operation_type = OperationType::try_from(value)
            .map_err(|_| XdrError::UnsupportedOperationResult(value))?;
        let inner = match operation_type {
            OperationType::CreateAccount => {
                OperationInnerResult::CreateAccount(CreateAccountResultCode::decode(reader)?)
            }
            OperationType::Payment => OperationInnerResult::Payment(PaymentResultCode::decode(reader)?),
            OperationType::ManageSellOffer => {
                OperationInnerResult::ManageSellOffer(ManageOfferResult::decode(reader)?)
            }
            OperationType::ManageBuyOffer => {
                OperationInnerResult::ManageBuyOffer(ManageOfferResult::decode(reader)?)
            }
            OperationType::ChangeTrust => {
                OperationInnerResult::ChangeTrust(ChangeTrustResultCode::decode(reader)?)
            }
            OperationType::AllowTrust => {
                OperationInnerResult::AllowTrust(AllowTrustResultCode::decode(reader)?)
            }
            other => return Err(XdrError::UnsupportedOperationResult(other.into())),
        };
        Ok(OperationResult::Inner(inner))
    }
}
