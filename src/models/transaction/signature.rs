use std::fmt;

use crate::{
    constants::{SIGNATURE_HINT_LENGTH, SIGNATURE_MAX_LENGTH},
    models::XdrError,
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// A detached signature tagged with the last four bytes of the signer's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedSignature {
    pub hint: [u8; 4],
    pub signature: Vec<u8>,
}

impl DecoratedSignature {
    pub fn new(hint: [u8; 4], signature: Vec<u8>) -> Self {
        Self { hint, signature }
    }
}

impl fmt::Display for DecoratedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(signature) hint {}", hex::encode(self.hint))
    }
}

impl XdrEncode for DecoratedSignature {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_opaque_fixed(&self.hint, SIGNATURE_HINT_LENGTH)?;
        writer.write_opaque_variable(&self.signature, Some(SIGNATURE_MAX_LENGTH))
    }
}

impl XdrDecode for DecoratedSignature {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let raw_hint = reader.read_opaque_fixed(SIGNATURE_HINT_LENGTH)?;
        let mut hint = [0u8; 4];
        hint.copy_from_slice(raw_hint);
        let signature = reader
            .read_opaque_variable(Some(SIGNATURE_MAX_LENGTH))?
            .to_vec();
        Ok(Self { hint, signature })
    }
}
