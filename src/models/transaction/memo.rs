use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{
    constants::MEMO_TEXT_MAX_LENGTH,
    models::{ValueError, XdrError},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(i32)]
pub enum MemoType {
    None = 0,
    Text = 1,
    Id = 2,
    Hash = 3,
    Return = 4,
}

/// Free-form annotation attached to a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Memo {
    #[default]
    None,
    /// Up to 28 bytes of UTF-8 text.
    Text(String),
    Id(u64),
    Hash([u8; 32]),
    /// Hash of the transaction this one refunds.
    Return([u8; 32]),
}

impl Memo {
    pub fn text(text: &str) -> Result<Self, ValueError> {
        if text.len() > MEMO_TEXT_MAX_LENGTH {
            return Err(ValueError::InvalidMemo(format!(
                "memo text is {} bytes, the maximum is {}",
                text.len(),
                MEMO_TEXT_MAX_LENGTH
            )));
        }
        Ok(Memo::Text(text.to_string()))
    }

    pub fn memo_type(&self) -> MemoType {
        match self {
            Memo::None => MemoType::None,
            Memo::Text(_) => MemoType::Text,
            Memo::Id(_) => MemoType::Id,
            Memo::Hash(_) => MemoType::Hash,
            Memo::Return(_) => MemoType::Return,
        }
    }
}

impl fmt::Display for Memo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Memo::None => f.write_str("(none)"),
            Memo::Text(text) => write!(f, "(text) {}", text),
            Memo::Id(id) => write!(f, "(id) {}", id),
            Memo::Hash(hash) => write!(f, "(hash) {}", hex::encode(hash)),
            Memo::Return(hash) => write!(f, "(return) {}", hex::encode(hash)),
        }
    }
}

impl XdrEncode for Memo {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_i32(self.memo_type().into());
        match self {
            Memo::None => Ok(()),
            Memo::Text(text) => writer.write_string(text, MEMO_TEXT_MAX_LENGTH),
            Memo::Id(id) => {
                writer.write_u64(*id);
                Ok(())
            }
            Memo::Hash(hash) | Memo::Return(hash) => {
                writer.write_hash(hash);
                Ok(())
            }
        }
    }
}

impl XdrDecode for Memo {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let value = reader.read_i32()?;
        let memo_type = MemoType::try_from(value)
            .map_err(|_| XdrError::InvalidDiscriminant { kind: "MemoType", value })?;
        Ok(match memo_type {
            MemoType::None => Memo::None,
            MemoType::Text => Memo::Text(reader.read_string(MEMO_TEXT_MAX_LENGTH)?),
            MemoType::Id => Memo::Id(reader.read_u64()?),
            MemoType::Hash => Memo::Hash(reader.read_hash()?),
            MemoType::Return => Memo::Return(reader.read_hash()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_limit() {
        assert!(Memo::text("ema bot order").is_ok());
        assert!(Memo::text(&"x".repeat(28)).is_ok());
        assert!(matches!(
            Memo::text(&"x".repeat(29)),
            Err(ValueError::InvalidMemo(_))
        ));
    }

    #[test]
    fn test_none_encoding() {
        assert_eq!(Memo::None.to_xdr().unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_text_encoding() {
        let bytes = Memo::text("hi").unwrap().to_xdr().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 1, 0, 0, 0, 2, b'h', b'i', 0, 0]);
    }

    #[test]
    fn test_round_trip_variants() {
        for memo in [
            Memo::None,
            Memo::Text(String::new()),
            Memo::Id(u64::MAX),
            Memo::Hash([9u8; 32]),
            Memo::Return([1u8; 32]),
        ] {
            let bytes = memo.to_xdr().unwrap();
            assert_eq!(Memo::from_xdr(&bytes).unwrap(), memo);
        }
    }

    #[test]
    fn test_oversized_text_fails_both_ways() {
        let memo = Memo::Text("x".repeat(29));
        assert!(memo.to_xdr().is_err());

        let mut bytes = vec![0, 0, 0, 1, 0, 0, 0, 29];
        bytes.extend(vec![b'x'; 32]);
        assert!(matches!(
            Memo::from_xdr(&bytes),
            Err(XdrError::LengthExceedsMax { length: 29, max: 28 })
        ));
    }

    #[test]
    fn test_unknown_type() {
        assert!(matches!(
            Memo::from_xdr(&[0, 0, 0, 5]),
            Err(XdrError::InvalidDiscriminant { kind: "MemoType", value: 5 })
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Memo::Id(7).to_string(), "(id) 7");
        assert_eq!(Memo::None.to_string(), "(none)");
    }
}
