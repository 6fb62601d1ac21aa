//! Tradeable assets: the native lumen or a credit issued by an account.

use std::{fmt, str::FromStr};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::{
    models::{AccountId, ValueError, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Wire discriminant of an asset, named as Horizon names it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoPrimitive, TryFromPrimitive,
)]
#[repr(i32)]
pub enum AssetType {
    #[strum(serialize = "native")]
    Native = 0,
    #[strum(serialize = "credit_alphanum4")]
    CreditAlphanum4 = 1,
    #[strum(serialize = "credit_alphanum12")]
    CreditAlphanum12 = 2,
}

impl AssetType {
    pub(crate) fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let value = reader.read_i32()?;
        AssetType::try_from(value).map_err(|_| XdrError::InvalidDiscriminant {
            kind: "AssetType",
            value,
        })
    }

    /// Width of the zero-padded code field on the wire.
    pub(crate) fn code_length(&self) -> usize {
        match self {
            AssetType::Native => 0,
            AssetType::CreditAlphanum4 => 4,
            AssetType::CreditAlphanum12 => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Asset {
    Native,
    CreditAlphanum4 { code: String, issuer: AccountId },
    CreditAlphanum12 { code: String, issuer: AccountId },
}

impl Asset {
    pub fn native() -> Self {
        Asset::Native
    }

    /// Builds a credit asset; codes of up to 4 characters are alphanum-4,
    /// longer codes (up to 12) are alphanum-12.
    pub fn credit(code: &str, issuer: AccountId) -> Result<Self, ValueError> {
        validate_code(code)?;
        let code = code.to_string();
        if code.len() <= 4 {
            Ok(Asset::CreditAlphanum4 { code, issuer })
        } else {
            Ok(Asset::CreditAlphanum12 { code, issuer })
        }
    }

    /// Builds an asset from the `asset_type`/`asset_code`/`asset_issuer`
    /// triple Horizon uses in its JSON records.
    pub fn from_horizon(
        asset_type: &str,
        code: Option<&str>,
        issuer: Option<&str>,
    ) -> Result<Self, ValueError> {
        let asset_type: AssetType = asset_type
            .parse()
            .map_err(|_| ValueError::InvalidAsset(format!("unknown asset type '{}'", asset_type)))?;
        if asset_type == AssetType::Native {
            return Ok(Asset::Native);
        }

        let code = code.ok_or_else(|| ValueError::InvalidAsset("missing asset code".to_string()))?;
        let issuer = issuer
            .ok_or_else(|| ValueError::InvalidAsset("missing asset issuer".to_string()))?;
        let issuer = AccountId::from_address(issuer)
            .map_err(|e| ValueError::InvalidAsset(format!("invalid issuer: {}", e)))?;

        let asset = Asset::credit(code, issuer)?;
        if asset.asset_type() != asset_type {
            return Err(ValueError::InvalidAsset(format!(
                "code '{}' does not match asset type {}",
                code, asset_type
            )));
        }
        Ok(asset)
    }

    pub fn asset_type(&self) -> AssetType {
        match self {
            Asset::Native => AssetType::Native,
            Asset::CreditAlphanum4 { .. } => AssetType::CreditAlphanum4,
            Asset::CreditAlphanum12 { .. } => AssetType::CreditAlphanum12,
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { code, .. } | Asset::CreditAlphanum12 { code, .. } => {
                Some(code)
            }
        }
    }

    pub fn issuer(&self) -> Option<&AccountId> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { issuer, .. } | Asset::CreditAlphanum12 { issuer, .. } => {
                Some(issuer)
            }
        }
    }

    /// Query parameters describing this asset, e.g. `selling_asset_type`,
    /// `selling_asset_code` and `selling_asset_issuer` for prefix `selling`.
    pub fn horizon_params(&self, prefix: &str) -> Vec<(String, String)> {
        let mut params = vec![(
            format!("{}_asset_type", prefix),
            self.asset_type().to_string(),
        )];
        if let (Some(code), Some(issuer)) = (self.code(), self.issuer()) {
            params.push((format!("{}_asset_code", prefix), code.to_string()));
            params.push((format!("{}_asset_issuer", prefix), issuer.address()));
        }
        params
    }

    fn encode_code(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        let asset_type = self.asset_type();
        writer.write_i32(asset_type.into());
        if let Some(code) = self.code() {
            writer.write_opaque_fixed(code.as_bytes(), asset_type.code_length())?;
        }
        Ok(())
    }
}

/// Reads a zero-padded asset code of `length` bytes.
pub(crate) fn asset_code_field(
    reader: &mut XdrReader<'_>,
    length: usize,
) -> Result<String, XdrError> {
    let raw = reader.read_opaque_fixed(length)?;
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    if raw[end..].iter().any(|b| *b != 0) {
        return Err(XdrError::InvalidValue(
            "asset code has data after its terminator".to_string(),
        ));
    }
    let code = std::str::from_utf8(&raw[..end]).map_err(|e| XdrError::InvalidUtf8(e.to_string()))?;
    validate_code(code).map_err(|e| XdrError::InvalidValue(e.to_string()))?;
    Ok(code.to_string())
}

fn validate_code(code: &str) -> Result<(), ValueError> {
    if code.is_empty() || code.len() > 12 {
        return Err(ValueError::InvalidAsset(format!(
            "asset code must be 1 to 12 characters, got '{}'",
            code
        )));
    }
    if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ValueError::InvalidAsset(format!(
            "asset code must be alphanumeric, got '{}'",
            code
        )));
    }
    Ok(())
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code(), self.issuer()) {
            (Some(code), Some(issuer)) => write!(f, "{}:{}", code, issuer),
            _ => f.write_str("native"),
        }
    }
}

/// Parses `native` or `CODE:ISSUER`.
impl FromStr for Asset {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("native") {
            return Ok(Asset::Native);
        }
        let (code, issuer) = s
            .split_once(':')
            .ok_or_else(|| ValueError::InvalidAsset(format!("expected CODE:ISSUER, got '{}'", s)))?;
        let issuer = AccountId::from_address(issuer)
            .map_err(|e| ValueError::InvalidAsset(format!("invalid issuer: {}", e)))?;
        Asset::credit(code, issuer)
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

impl XdrEncode for Asset {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.encode_code(writer)?;
        if let Some(issuer) = self.issuer() {
            issuer.encode(writer)?;
        }
        Ok(())
    }
}

impl XdrDecode for Asset {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let asset_type = AssetType::decode(reader)?;
        match asset_type {
            AssetType::Native => Ok(Asset::Native),
            AssetType::CreditAlphanum4 => {
                let code = asset_code_field(reader, 4)?;
                let issuer = AccountId::decode(reader)?;
                Ok(Asset::CreditAlphanum4 { code, issuer })
            }
            AssetType::CreditAlphanum12 => {
                let code = asset_code_field(reader, 12)?;
                if code.len() <= 4 {
                    return Err(XdrError::InvalidValue(format!(
                        "alphanum-12 asset code '{}' is too short",
                        code
                    )));
                }
                let issuer = AccountId::decode(reader)?;
                Ok(Asset::CreditAlphanum12 { code, issuer })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUER: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

    fn issuer() -> AccountId {
        ISSUER.parse().unwrap()
    }

    #[test]
    fn test_variant_follows_code_length() {
        assert_eq!(
            Asset::credit("USD", issuer()).unwrap().asset_type(),
            AssetType::CreditAlphanum4
        );
        assert_eq!(
            Asset::credit("EURT", issuer()).unwrap().asset_type(),
            AssetType::CreditAlphanum4
        );
        assert_eq!(
            Asset::credit("MOBI1", issuer()).unwrap().asset_type(),
            AssetType::CreditAlphanum12
        );
        assert_eq!(
            Asset::credit("ABCDEFGHIJKL", issuer()).unwrap().asset_type(),
            AssetType::CreditAlphanum12
        );
    }

    #[test]
    fn test_invalid_codes() {
        assert!(Asset::credit("", issuer()).is_err());
        assert!(Asset::credit("ABCDEFGHIJKLM", issuer()).is_err());
        assert!(Asset::credit("US-D", issuer()).is_err());
    }

    #[test]
    fn test_native_has_no_code_or_issuer() {
        let native = Asset::native();
        assert!(native.is_native());
        assert_eq!(native.code(), None);
        assert_eq!(native.issuer(), None);
        assert_eq!(native.to_xdr().unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_alphanum4_wire_layout() {
        let asset = Asset::credit("USD", issuer()).unwrap();
        let bytes = asset.to_xdr().unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 1]);
        assert_eq!(&bytes[4..8], b"USD\0");
        assert_eq!(bytes.len(), 4 + 4 + 36);
        assert_eq!(Asset::from_xdr(&bytes).unwrap(), asset);
    }

    #[test]
    fn test_alphanum12_wire_layout() {
        let asset = Asset::credit("ABCDEFGHIJKL", issuer()).unwrap();
        let bytes = asset.to_xdr().unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 2]);
        assert_eq!(&bytes[4..16], b"ABCDEFGHIJKL");
        assert_eq!(Asset::from_xdr(&bytes).unwrap(), asset);
    }

    #[test]
    fn test_decode_rejects_unknown_type() {
        assert_eq!(
            Asset::from_xdr(&[0, 0, 0, 3]),
            Err(XdrError::InvalidDiscriminant {
                kind: "AssetType",
                value: 3
            })
        );
    }

    #[test]
    fn test_decode_rejects_gap_in_code() {
        let mut bytes = vec![0, 0, 0, 1, b'U', 0, b'D', 0];
        bytes.extend(Asset::native().to_xdr().unwrap());
        bytes.extend_from_slice(&[0u8; 32]);
        assert!(matches!(
            Asset::from_xdr(&bytes),
            Err(XdrError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_horizon_params() {
        assert_eq!(
            Asset::native().horizon_params("selling"),
            vec![("selling_asset_type".to_string(), "native".to_string())]
        );
        let params = Asset::credit("USD", issuer()).unwrap().horizon_params("base");
        assert_eq!(
            params,
            vec![
                ("base_asset_type".to_string(), "credit_alphanum4".to_string()),
                ("base_asset_code".to_string(), "USD".to_string()),
                ("base_asset_issuer".to_string(), ISSUER.to_string()),
            ]
        );
    }

    #[test]
    fn test_from_horizon() {
        assert_eq!(Asset::from_horizon("native", None, None).unwrap(), Asset::Native);
        let asset = Asset::from_horizon("credit_alphanum4", Some("USD"), Some(ISSUER)).unwrap();
        assert_eq!(asset.code(), Some("USD"));
        assert!(Asset::from_horizon("credit_alphanum12", Some("USD"), Some(ISSUER)).is_err());
        assert!(Asset::from_horizon("credit_alphanum4", None, Some(ISSUER)).is_err());
        assert!(Asset::from_horizon("liquidity_pool_shares", None, None).is_err());
    }

    #[test]
    fn test_string_form() {
        let asset: Asset = format!("USD:{}", ISSUER).parse().unwrap();
        assert_eq!(asset.to_string(), format!("USD:{}", ISSUER));
        assert_eq!("native".parse::<Asset>().unwrap(), Asset::Native);
        assert!("USD".parse::<Asset>().is_err());

        let json = serde_json::to_string(&asset).unwrap();
        assert_eq!(serde_json::from_str::<Asset>(&json).unwrap(), asset);
    }
}
