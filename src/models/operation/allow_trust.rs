use std::fmt;

use crate::{
    models::{asset_code_field, AccountId, AssetType, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Authorization flag: the trustor may hold and trade the asset.
pub const TRUST_LINE_AUTHORIZED: u32 = 1;
/// Authorization flag: the trustor may keep existing offers but not add new ones.
pub const TRUST_LINE_AUTHORIZED_TO_MAINTAIN_LIABILITIES: u32 = 2;

/// Issuer-side authorization of another account's trust line. The asset is
/// identified by its code alone; the issuer is the operation's source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowTrustOp {
    pub trustor: AccountId,
    pub asset_code: String,
    pub authorize: u32,
}

impl AllowTrustOp {
    pub fn is_authorized(&self) -> bool {
        self.authorize & TRUST_LINE_AUTHORIZED != 0
    }
}

impl fmt::Display for AllowTrustOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} for {}",
            if self.is_authorized() { "allow" } else { "revoke" },
            self.asset_code,
            self.trustor
        )
    }
}

impl XdrEncode for AllowTrustOp {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.trustor.encode(writer)?;
        let asset_type = if self.asset_code.len() <= 4 {
            AssetType::CreditAlphanum4
        } else {
            AssetType::CreditAlphanum12
        };
        writer.write_i32(asset_type.into());
        writer.write_opaque_fixed(self.asset_code.as_bytes(), asset_type.code_length())?;
        writer.write_u32(self.authorize);
        Ok(())
    }
}

impl XdrDecode for AllowTrustOp {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let trustor = AccountId::decode(reader)?;
        let asset_type = AssetType::decode(reader)?;
        if asset_type == AssetType::Native {
            return Err(XdrError::InvalidDiscriminant {
                kind: "AllowTrustAsset",
                value: asset_type.into(),
            });
        }
        let asset_code = asset_code_field(reader, asset_type.code_length())?;
        Ok(Self {
            trustor,
            asset_code,
            authorize: reader.read_u32()?,
        })
    }
}
