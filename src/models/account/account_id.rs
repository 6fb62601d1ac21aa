//! Public account identities.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    models::{KeypairError, XdrError},
    utils::{decode_account_id, encode_account_id},
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

/// Key type discriminant of an ed25519 public key on the wire.
pub const PUBLIC_KEY_TYPE_ED25519: i32 = 0;

/// A 32-byte ed25519 public key identifying an account (`G...` address).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; 32]);

impl AccountId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parses a `G...` address, verifying its version byte and checksum.
    pub fn from_address(address: &str) -> Result<Self, KeypairError> {
        decode_account_id(address.trim()).map(Self)
    }

    pub fn address(&self) -> String {
        encode_account_id(&self.0)
    }

    /// Last four bytes of the key, used to tag signatures.
    pub fn signature_hint(&self) -> [u8; 4] {
        [self.0[28], self.0[29], self.0[30], self.0[31]]
    }
}

impl FromStr for AccountId {
    type Err = KeypairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.address())
    }
}

impl XdrEncode for AccountId {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        writer.write_i32(PUBLIC_KEY_TYPE_ED25519);
        writer.write_hash(&self.0);
        Ok(())
    }
}

impl XdrDecode for AccountId {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let key_type = reader.read_i32()?;
        if key_type != PUBLIC_KEY_TYPE_ED25519 {
            return Err(XdrError::InvalidDiscriminant {
                kind: "PublicKeyType",
                value: key_type,
            });
        }
        Ok(Self(reader.read_hash()?))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.address())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let address = String::deserialize(deserializer)?;
        AccountId::from_address(&address).map_err(de::Error::custom)
    }
}
