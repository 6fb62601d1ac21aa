use std::fmt;

use crate::{
    models::{
        Amount, ManageOfferSuccess, MissingTrust, OperationResult, TransactionResultCode,
        XdrError,
    },
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Outcome of a submitted transaction as reported in `result_xdr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    pub fee_charged: Amount,
    pub code: TransactionResultCode,
    /// Per-operation results; empty unless the code is success or failed.
    pub results: Vec<OperationResult>,
}

impl TransactionResult {
    pub fn is_success(&self) -> bool {
        self.code == TransactionResultCode::Success
    }

    /// First operation that failed for lack of a trust line, with its index.
    pub fn missing_trust(&self) -> Option<(usize, MissingTrust)> {
        self.results
            .iter()
            .enumerate()
            .find_map(|(index, result)| result.missing_trust().map(|side| (index, side)))
    }

    /// First successful manage-offer result in the transaction.
    pub fn offer_success(&self) -> Option<&ManageOfferSuccess> {
        self.results
            .iter()
            .filter_map(OperationResult::manage_offer)
            .find_map(|result| result.success())
    }

    /// Horizon-style `op_*` names of every operation result.
    pub fn operation_codes(&self) -> Vec<String> {
        self.results
            .iter()
            .map(|result| match result {
                OperationResult::Failed(code) => code.name().to_string(),
                OperationResult::Inner(inner) => inner.code_name().to_string(),
            })
            .collect()
    }
}

impl fmt::Display for TransactionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (fee charged {})", self.code, self.fee_charged)?;
        for (index, result) in self.results.iter().enumerate() {
            writeln!(f, "  #{}: {}", index, result)?;
        }
        Ok(())
    }
}

impl XdrEncode for TransactionResult {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.fee_charged.encode(writer)?;
        self.code.encode(writer)?;
        if self.code.has_operation_results() {
            writer.write_u32(self.results.len() as u32);
            for result in &self.results {
                result.encode(writer)?;
            }
        }
        // ext
        writer.write_i32(0);
        Ok(())
    }
}

impl XdrDecode for TransactionResult {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let fee_charged = Amount::decode(reader)?;
        let code = TransactionResultCode::decode(reader)?;

        let mut results = Vec::new();
        if code.has_operation_results() {
            let count = reader.read_length(None)?;
            for _ in 0..count {
                results.push(OperationResult::decode(reader)?);
            }
        } else if matches!(code, TransactionResultCode::Other(1) | TransactionResultCode::Other(-13)) {
            // fee-bump outcomes wrap an inner transaction result
            return Err(XdrError::InvalidValue(format!(
                "fee bump transaction result {} is not supported",
                code.code()
            )));
        }

        let ext = reader.read_i32()?;
        if ext != 0 {
            return Err(XdrError::InvalidDiscriminant {
                kind: "TransactionResultExt",
                value: ext,
            });
        }

        Ok(Self {
            fee_charged,
            code,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AccountId, Asset, ClaimOfferAtom, ManageOfferEffect, ManageOfferResult,
        ManageOfferResultCode, OfferEntry, OperationInnerResult, PaymentResultCode, Price,
    };

    fn offer_result() -> OperationResult {
        let issuer = AccountId::from_bytes([1u8; 32]);
        OperationResult::Inner(OperationInnerResult::ManageSellOffer(
            ManageOfferResult::Success(ManageOfferSuccess {
                offers_claimed: vec![ClaimOfferAtom {
                    seller_id: issuer,
                    offer_id: 9,
                    asset_sold: Asset::credit("USD", issuer).unwrap(),
                    amount_sold: "1".parse().unwrap(),
                    asset_bought: Asset::Native,
                    amount_bought: "4.7".parse().unwrap(),
                }],
                effect: ManageOfferEffect::Updated(OfferEntry {
                    seller_id: AccountId::from_bytes([2u8; 32]),
                    offer_id: 31337,
                    selling: Asset::Native,
                    buying: Asset::credit("USD", issuer).unwrap(),
                    amount: "95.8".parse().unwrap(),
                    price: Price::new(2129193, 10000000).unwrap(),
                    flags: 0,
                }),
            }),
        ))
    }

    #[test]
    fn test_success_round_trip() {
        let result = TransactionResult {
            fee_charged: Amount::from_stroops(100),
            code: TransactionResultCode::Success,
            results: vec![offer_result()],
        };
        let encoded = result.to_xdr_base64().unwrap();
        let decoded = TransactionResult::from_xdr_base64(&encoded).unwrap();
        assert_eq!(decoded, result);
        assert!(decoded.is_success());
        assert_eq!(decoded.offer_success().unwrap().effect.offer().unwrap().offer_id, 31337);
    }

    #[test]
    fn test_rejection_has_no_operation_results() {
        let mut bytes = 100i64.to_be_bytes().to_vec();
        bytes.extend_from_slice(&(-5i32).to_be_bytes());
        bytes.extend_from_slice(&0i32.to_be_bytes());
        let result = TransactionResult::from_xdr(&bytes).unwrap();
        assert_eq!(result.code, TransactionResultCode::BadSeq);
        assert!(result.results.is_empty());
    }

    #[test]
    fn test_failed_with_missing_trust() {
        let result = TransactionResult {
            fee_charged: Amount::from_stroops(200),
            code: TransactionResultCode::Failed,
            results: vec![
                OperationResult::Inner(OperationInnerResult::Payment(PaymentResultCode::Success)),
                OperationResult::Inner(OperationInnerResult::ManageSellOffer(
                    ManageOfferResult::Failed(ManageOfferResultCode::BuyNoTrust),
                )),
            ],
        };
        let decoded = TransactionResult::from_xdr(&result.to_xdr().unwrap()).unwrap();
        assert_eq!(decoded.missing_trust(), Some((1, MissingTrust::Buying)));
        assert_eq!(decoded.operation_codes(), vec!["op_success", "op_buy_no_trust"]);
    }

    #[test]
    fn test_known_horizon_result_xdr() {
        // tx_failed, 100 stroops, one manage sell offer result: op_sell_no_trust
        let encoded = "AAAAAAAAAGT/////AAAAAQAAAAAAAAAD/////gAAAAA=";
        let result = TransactionResult::from_xdr_base64(encoded).unwrap();
        assert_eq!(result.fee_charged, Amount::from_stroops(100));
        assert_eq!(result.code, TransactionResultCode::Failed);
        assert_eq!(result.missing_trust(), Some((0, MissingTrust::Selling)));
    }

    #[test]
    fn test_truncated_result() {
        let bytes = TransactionResult {
            fee_charged: Amount::from_stroops(100),
            code: TransactionResultCode::Success,
            results: vec![offer_result()],
        }
        .to_xdr()
        .unwrap();
        assert!(TransactionResult::from_xdr(&bytes[..bytes.len() - 8]).is_err());
    }
}
