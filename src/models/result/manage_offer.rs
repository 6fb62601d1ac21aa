//! Manage-offer results: fills against existing offers and the offer left
//! on the book.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    models::{AccountId, Amount, Asset, ManageOfferResultCode, Price, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// A fill taken from another account's offer while this offer crossed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOfferAtom {
    /// Owner of the offer that was claimed.
    pub seller_id: AccountId,
    pub offer_id: u64,
    /// Asset and amount taken from the owner.
    pub asset_sold: Asset,
    pub amount_sold: Amount,
    /// Asset and amount sent to the owner.
    pub asset_bought: Asset,
    pub amount_bought: Amount,
}

impl fmt::Display for ClaimOfferAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offer {} of {}: sold {} {}, bought {} {}",
            self.offer_id,
            self.seller_id,
            self.amount_sold,
            self.asset_sold,
            self.amount_bought,
            self.asset_bought
        )
    }
}

impl XdrEncode for ClaimOfferAtom {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.seller_id.encode(writer)?;
        writer.write_u64(self.offer_id);
        self.asset_sold.encode(writer)?;
        self.amount_sold.encode(writer)?;
        self.asset_bought.encode(writer)?;
        self.amount_bought.encode(writer)
    }
}

impl XdrDecode for ClaimOfferAtom {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        Ok(Self {
            seller_id: AccountId::decode(reader)?,
            offer_id: reader.read_u64()?,
            asset_sold: Asset::decode(reader)?,
            amount_sold: Amount::decode(reader)?,
            asset_bought: Asset::decode(reader)?,
            amount_bought: Amount::decode(reader)?,
        })
    }
}

/// An offer as it stands on the book after the operation applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferEntry {
    pub seller_id: AccountId,
    pub offer_id: u64,
    pub selling: Asset,
    pub buying: Asset,
    pub amount: Amount,
    pub price: Price,
    pub flags: u32,
}

impl XdrEncode for OfferEntry {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.seller_id.encode(writer)?;
        writer.write_u64(self.offer_id);
        self.selling.encode(writer)?;
        self.buying.encode(writer)?;
        self.amount.encode(writer)?;
        self.price.encode(writer)?;
        writer.write_u32(self.flags);
        // ext
        writer.write_i32(0);
        Ok(())
    }
}

impl XdrDecode for OfferEntry {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let entry = Self {
            seller_id: AccountId::decode(reader)?,
            offer_id: reader.read_u64()?,
            selling: Asset::decode(reader)?,
            buying: Asset::decode(reader)?,
            amount: Amount::decode(reader)?,
            price: Price::decode(reader)?,
            flags: reader.read_u32()?,
        };
        let ext = reader.read_i32()?;
        if ext != 0 {
            return Err(XdrError::InvalidDiscriminant {
                kind: "OfferEntryExt",
                value: ext,
            });
        }
        Ok(entry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum ManageOfferEffectType {
    Created = 0,
    Updated = 1,
    Deleted = 2,
}

/// What happened to the offer itself once the fills were applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageOfferEffect {
    Created(OfferEntry),
    Updated(OfferEntry),
    /// Fully filled, or cancelled; nothing remains on the book.
    Deleted,
}

impl ManageOfferEffect {
    pub fn offer(&self) -> Option<&OfferEntry> {
        match self {
            ManageOfferEffect::Created(offer) | ManageOfferEffect::Updated(offer) => Some(offer),
            ManageOfferEffect::Deleted => None,
        }
    }

    fn effect_type(&self) -> ManageOfferEffectType {
        match self {
            ManageOfferEffect::Created(_) => ManageOfferEffectType::Created,
            ManageOfferEffect::Updated(_) => ManageOfferEffectType::Updated,
            ManageOfferEffect::Deleted => ManageOfferEffectType::Deleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManageOfferSuccess {
    pub offers_claimed: Vec<ClaimOfferAtom>,
    pub effect: ManageOfferEffect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageOfferResult {
    Success(ManageOfferSuccess),
    Failed(ManageOfferResultCode),
}

impl ManageOfferResult {
    pub fn code(&self) -> ManageOfferResultCode {
        match self {
            ManageOfferResult::Success(_) => ManageOfferResultCode::Success,
            ManageOfferResult::Failed(code) => *code,
        }
    }

    pub fn success(&self) -> Option<&ManageOfferSuccess> {
        match self {
            ManageOfferResult::Success(success) => Some(success),
            ManageOfferResult::Failed(_) => None,
        }
    }
}

impl fmt::Display for ManageOfferResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManageOfferResult::Failed(code) => write!(f, "{}", code),
            ManageOfferResult::Success(success) => {
                write!(f, "op_success, {} claimed", success.offers_claimed.len())?;
                match &success.effect {
                    ManageOfferEffect::Created(offer) => write!(f, ", created offer {}", offer.offer_id),
                    ManageOfferEffect::Updated(offer) => write!(f, ", updated offer {}", offer.offer_id),
                    ManageOfferEffect::Deleted => write!(f, ", offer deleted"),
                }
            }
        }
    }
}

impl XdrEncode for ManageOfferResult {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.code().encode(writer)?;
        if let ManageOfferResult::Success(success) = self {
            writer.write_u32(success.offers_claimed.len() as u32);
            for atom in &success.offers_claimed {
                atom.encode(writer)?;
            }
            writer.write_i32(success.effect.effect_type().into());
            if let Some(offer) = success.effect.offer() {
                offer.encode(writer)?;
            }
        }
        Ok(())
    }
}

impl XdrDecode for ManageOfferResult {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let code = ManageOfferResultCode::decode(reader)?;
        if code != ManageOfferResultCode::Success {
            return Ok(ManageOfferResult::Failed(code));
        }

        let count = reader.read_length(None)?;
        let mut offers_claimed = Vec::new();
        for _ in 0..count {
            offers_claimed.push(ClaimOfferAtom::decode(reader)?);
        }

        let value = reader.read_i32()?;
        let effect_type = ManageOfferEffectType::try_from(value).map_err(|_| {
            XdrError::InvalidDiscriminant {
                kind: "ManageOfferEffect",
                value,
            }
        })?;
        let effect = match effect_type {
            ManageOfferEffectType::Created => ManageOfferEffect::Created(OfferEntry::decode(reader)?),
            ManageOfferEffectType::Updated => ManageOfferEffect::Updated(OfferEntry::decode(reader)?),
            ManageOfferEffectType::Deleted => ManageOfferEffect::Deleted,
        };

        Ok(ManageOfferResult::Success(ManageOfferSuccess {
            offers_claimed,
            effect,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(byte: u8) -> AccountId {
        AccountId::from_bytes([byte; 32])
    }

    fn usd() -> Asset {
        Asset::credit("USD", account(1)).unwrap()
    }

    fn atom() -> ClaimOfferAtom {
        ClaimOfferAtom {
            seller_id: account(2),
            offer_id: 77,
            asset_sold: usd(),
            amount_sold: "21.29193".parse().unwrap(),
            asset_bought: Asset::Native,
            amount_bought: "100".parse().unwrap(),
        }
    }

    fn entry() -> OfferEntry {
        OfferEntry {
            seller_id: account(3),
            offer_id: 12345,
            selling: Asset::Native,
            buying: usd(),
            amount: "0.5".parse().unwrap(),
            price: Price::new(2129193, 10000000).unwrap(),
            flags: 0,
        }
    }

    #[test]
    fn test_created_with_claims_round_trip() {
        let result = ManageOfferResult::Success(ManageOfferSuccess {
            offers_claimed: vec![atom(), atom()],
            effect: ManageOfferEffect::Created(entry()),
        });
        let bytes = result.to_xdr().unwrap();
        let decoded = ManageOfferResult::from_xdr(&bytes).unwrap();
        assert_eq!(decoded, result);
        assert_eq!(
            decoded.success().unwrap().effect.offer().unwrap().offer_id,
            12345
        );
    }

    #[test]
    fn test_deleted_has_no_offer() {
        let result = ManageOfferResult::Success(ManageOfferSuccess {
            offers_claimed: vec![atom()],
            effect: ManageOfferEffect::Deleted,
        });
        let bytes = result.to_xdr().unwrap();
        // code, count, one atom, effect; no trailing offer entry
        let atom_len = atom().to_xdr().unwrap().len();
        assert_eq!(bytes.len(), 4 + 4 + atom_len + 4);
        assert_eq!(ManageOfferResult::from_xdr(&bytes).unwrap(), result);
    }

    #[test]
    fn test_failure_carries_only_code() {
        let bytes = (-2i32).to_be_bytes();
        let result = ManageOfferResult::from_xdr(&bytes).unwrap();
        assert_eq!(result, ManageOfferResult::Failed(ManageOfferResultCode::SellNoTrust));
        assert!(result.success().is_none());
    }

    #[test]
    fn test_invalid_effect() {
        let mut bytes = vec![0, 0, 0, 0, 0, 0, 0, 0];
        bytes.extend_from_slice(&3i32.to_be_bytes());
        assert_eq!(
            ManageOfferResult::from_xdr(&bytes),
            Err(XdrError::InvalidDiscriminant {
                kind: "ManageOfferEffect",
                value: 3
            })
        );
    }

    #[test]
    fn test_truncated_claims() {
        // declares two atoms, provides none
        let bytes = [0, 0, 0, 0, 0, 0, 0, 2];
        assert!(matches!(
            ManageOfferResult::from_xdr(&bytes),
            Err(XdrError::UnexpectedEof { .. })
        ));
    }
}
