//! XDR wire codec
//!
//! Primitive read/write support for the ledger's fixed-record binary format
//! and the `XdrEncode`/`XdrDecode` traits every wire type implements.
//!
//! ## Encoding rules
//!
//! - 4-byte big-endian signed/unsigned integers, booleans as 4-byte 0/1
//! - 8-byte big-endian signed/unsigned hyper integers
//! - fixed opaque data zero-padded to a 4-byte boundary
//! - variable opaque data and strings prefixed by their length, then padded
//! - optional values as a boolean discriminant followed by the value

mod reader;
pub use reader::*;

mod writer;
pub use writer::*;

use crate::models::XdrError;
use crate::utils::{base64_decode, base64_encode};

/// Rounds `length` up to the next multiple of four.
pub(crate) const fn padded_len(length: usize) -> usize {
    (length + 3) & !3
}

/// A value that can serialize itself into an [`XdrWriter`].
pub trait XdrEncode {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError>;

    fn to_xdr(&self) -> Result<Vec<u8>, XdrError> {
        let mut writer = XdrWriter::new();
        self.encode(&mut writer)?;
        Ok(writer.into_bytes())
    }

    fn to_xdr_base64(&self) -> Result<String, XdrError> {
        Ok(base64_encode(&self.to_xdr()?))
    }
}

/// A value that can be read back from an [`XdrReader`].
pub trait XdrDecode: Sized {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError>;

    /// Decodes a complete value, rejecting any bytes left over.
    fn from_xdr(bytes: &[u8]) -> Result<Self, XdrError> {
        let mut reader = XdrReader::new(bytes);
        let value = Self::decode(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }

    fn from_xdr_base64(encoded: &str) -> Result<Self, XdrError> {
        let bytes =
            base64_decode(encoded.trim()).map_err(|e| XdrError::InvalidBase64(e.to_string()))?;
        Self::from_xdr(&bytes)
    }
}

impl<T: XdrEncode + ?Sized> XdrEncode for &T {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        (**self).encode(writer)
    }
}
