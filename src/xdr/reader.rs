use super::{padded_len, XdrDecode};
use crate::models::XdrError;

/// Sequential read cursor over XDR bytes.
///
/// Every read checks the remaining length first; running past the end of the
/// buffer is an error, never a silent truncation.
#[derive(Debug, Clone)]
pub struct XdrReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> XdrReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// Fails unless every byte has been consumed.
    pub fn finish(&self) -> Result<(), XdrError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(XdrError::TrailingBytes(n)),
        }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], XdrError> {
        if count > self.remaining() {
            return Err(XdrError::UnexpectedEof {
                needed: count,
                remaining: self.remaining(),
            });
        }
        let bytes: &'a [u8] = self.bytes;
        let slice = &bytes[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], XdrError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn skip_padding(&mut self, length: usize) -> Result<(), XdrError> {
        let padding = self.take(padded_len(length) - length)?;
        if padding.iter().any(|b| *b != 0) {
            return Err(XdrError::NonZeroPadding);
        }
        Ok(())
    }

    pub fn read_i32(&mut self) -> Result<i32, XdrError> {
        Ok(i32::from_be_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, XdrError> {
        Ok(u32::from_be_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, XdrError> {
        Ok(i64::from_be_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, XdrError> {
        Ok(u64::from_be_bytes(self.take_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool, XdrError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(XdrError::InvalidBool(other)),
        }
    }

    /// Reads `length` bytes of fixed opaque data plus its padding.
    pub fn read_opaque_fixed(&mut self, length: usize) -> Result<&'a [u8], XdrError> {
        if padded_len(length) > self.remaining() {
            return Err(XdrError::UnexpectedEof {
                needed: padded_len(length),
                remaining: self.remaining(),
            });
        }
        let data = self.take(length)?;
        self.skip_padding(length)?;
        Ok(data)
    }

    /// Reads length-prefixed opaque data, failing when the declared length
    /// exceeds `max_length`.
    pub fn read_opaque_variable(
        &mut self,
        max_length: Option<usize>,
    ) -> Result<&'a [u8], XdrError> {
        let length = self.read_u32()? as usize;
        if let Some(max) = max_length {
            if length > max {
                return Err(XdrError::LengthExceedsMax { length, max });
            }
        }
        self.read_opaque_fixed(length)
    }

    pub fn read_string(&mut self, max_length: usize) -> Result<String, XdrError> {
        let data = self.read_opaque_variable(Some(max_length))?;
        String::from_utf8(data.to_vec()).map_err(|e| XdrError::InvalidUtf8(e.to_string()))
    }

    pub fn read_hash(&mut self) -> Result<[u8; 32], XdrError> {
        self.take_array()
    }

    /// Reads a boolean discriminant and, when set, the value that follows.
    pub fn read_optional<T: XdrDecode>(&mut self) -> Result<Option<T>, XdrError> {
        if self.read_bool()? {
            Ok(Some(T::decode(self)?))
        } else {
            Ok(None)
        }
    }

    /// Reads an array length prefix, bounded by `max_length` when given.
    pub fn read_length(&mut self, max_length: Option<usize>) -> Result<usize, XdrError> {
        let length = self.read_u32()? as usize;
        match max_length {
            Some(max) if length > max => Err(XdrError::LengthExceedsMax { length, max }),
            _ => Ok(length),
        }
    }
}

impl XdrDecode for u32 {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        reader.read_u32()
    }
}

impl XdrDecode for i32 {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        reader.read_i32()
    }
}

impl XdrDecode for u64 {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        reader.read_u64()
    }
}

impl XdrDecode for i64 {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        reader.read_i64()
    }
}

impl XdrDecode for bool {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        reader.read_bool()
    }
}
