use super::{padded_len, XdrEncode};
use crate::models::XdrError;
use sha2::{Digest, Sha256};

/// Append-only write cursor producing XDR bytes.
#[derive(Debug, Default, Clone)]
pub struct XdrWriter {
    bytes: Vec<u8>,
}

impl XdrWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u32(u32::from(value));
    }

    /// Writes `value` as fixed opaque data of exactly `length` bytes.
    ///
    /// Shorter values are right-padded with zeros up to `length` (asset codes
    /// rely on this); longer values are rejected. The result is then padded
    /// to a 4-byte boundary.
    pub fn write_opaque_fixed(&mut self, value: &[u8], length: usize) -> Result<(), XdrError> {
        if value.len() > length {
            return Err(XdrError::InvalidFixedLength {
                expected: length,
                actual: value.len(),
            });
        }
        self.bytes.extend_from_slice(value);
        self.pad(padded_len(length) - value.len());
        Ok(())
    }

    /// Writes length-prefixed opaque data, padded to a 4-byte boundary.
    pub fn write_opaque_variable(
        &mut self,
        value: &[u8],
        max_length: Option<usize>,
    ) -> Result<(), XdrError> {
        if let Some(max) = max_length {
            if value.len() > max {
                return Err(XdrError::LengthExceedsMax {
                    length: value.len(),
                    max,
                });
            }
        }
        let length = u32::try_from(value.len()).map_err(|_| XdrError::LengthExceedsMax {
            length: value.len(),
            max: u32::MAX as usize,
        })?;
        self.write_u32(length);
        self.bytes.extend_from_slice(value);
        self.pad(padded_len(value.len()) - value.len());
        Ok(())
    }

    pub fn write_string(&mut self, value: &str, max_length: usize) -> Result<(), XdrError> {
        self.write_opaque_variable(value.as_bytes(), Some(max_length))
    }

    /// Writes an optional value as a boolean discriminant plus the value.
    pub fn write_optional<T: XdrEncode>(&mut self, value: Option<&T>) -> Result<(), XdrError> {
        match value {
            Some(inner) => {
                self.write_bool(true);
                inner.encode(self)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    pub fn write_hash(&mut self, hash: &[u8; 32]) {
        self.bytes.extend_from_slice(hash);
    }

    /// Writes the SHA-256 digest of `data` as a 32-byte hash.
    pub fn write_sha256_of(&mut self, data: &[u8]) {
        let digest: [u8; 32] = Sha256::digest(data).into();
        self.write_hash(&digest);
    }

    fn pad(&mut self, count: usize) {
        self.bytes.extend(std::iter::repeat_n(0u8, count));
    }
}

impl XdrEncode for u32 {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_u32(*self);
        Ok(())
    }
}

impl XdrEncode for i32 {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_i32(*self);
        Ok(())
    }
}

impl XdrEncode for u64 {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_u64(*self);
        Ok(())
    }
}

impl XdrEncode for i64 {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_i64(*self);
        Ok(())
    }
}

impl XdrEncode for bool {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_bool(*self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_integers_big_endian() {
        let mut writer = XdrWriter::new();
        writer.write_u32(1);
        writer.write_i32(-1);
        writer.write_u64(0x0102_0304_0506_0708);
        writer.write_i64(-2);
        assert_eq!(
            writer.as_bytes(),
            &[
                0, 0, 0, 1, 0xff, 0xff, 0xff, 0xff, 1, 2, 3, 4, 5, 6, 7, 8, 0xff, 0xff, 0xff,
                0xff, 0xff, 0xff, 0xff, 0xfe
            ]
        );
    }

    #[test]
    fn test_write_bool() {
        let mut writer = XdrWriter::new();
        writer.write_bool(true);
        writer.write_bool(false);
        assert_eq!(writer.into_bytes(), vec![0, 0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_write_opaque_fixed_pads_short_values() {
        let mut writer = XdrWriter::new();
        writer.write_opaque_fixed(b"USD", 4).unwrap();
        assert_eq!(writer.as_bytes(), b"USD\0");

        let mut writer = XdrWriter::new();
        writer.write_opaque_fixed(b"ABCDE", 12).unwrap();
        assert_eq!(writer.len(), 12);
        assert_eq!(&writer.as_bytes()[..5], b"ABCDE");
        assert!(writer.as_bytes()[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_write_opaque_fixed_pads_to_boundary() {
        let mut writer = XdrWriter::new();
        writer.write_opaque_fixed(&[1, 2, 3, 4, 5], 5).unwrap();
        assert_eq!(writer.as_bytes(), &[1, 2, 3, 4, 5, 0, 0, 0]);
    }

    #[test]
    fn test_write_opaque_fixed_rejects_long_values() {
        let mut writer = XdrWriter::new();
        let result = writer.write_opaque_fixed(b"TOOLONG", 4);
        assert_eq!(
            result,
            Err(XdrError::InvalidFixedLength {
                expected: 4,
                actual: 7
            })
        );
        assert!(writer.is_empty());
    }

    #[test]
    fn test_write_opaque_variable() {
        let mut writer = XdrWriter::new();
        writer.write_opaque_variable(&[9, 9, 9], None).unwrap();
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 3, 9, 9, 9, 0]);
    }

    #[test]
    fn test_write_empty_opaque_variable() {
        let mut writer = XdrWriter::new();
        writer.write_opaque_variable(&[], Some(64)).unwrap();
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_write_string_enforces_max_length() {
        let mut writer = XdrWriter::new();
        let result = writer.write_string("a string that is far too long", 28);
        assert!(matches!(
            result,
            Err(XdrError::LengthExceedsMax { length: 29, max: 28 })
        ));
    }

    #[test]
    fn test_write_optional() {
        let mut writer = XdrWriter::new();
        writer.write_optional(Some(&5u32)).unwrap();
        writer.write_optional::<u32>(None).unwrap();
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 1, 0, 0, 0, 5, 0, 0, 0, 0]);
    }

    #[test]
    fn test_write_sha256_of() {
        let mut writer = XdrWriter::new();
        writer.write_sha256_of(b"abc");
        assert_eq!(
            hex::encode(writer.as_bytes()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
