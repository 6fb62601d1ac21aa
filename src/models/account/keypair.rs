//! # Keypairs
//!
//! An account identity with an optional ed25519 signing key. Keypairs built
//! from a public address can identify accounts and verify signatures but any
//! attempt to sign fails with [`KeypairError::MissingSecretKey`].
//!
//! ## Security Considerations
//!
//! The signing key lives in memory; `ed25519-dalek` zeroizes it on drop and
//! seeds exported through [`Keypair::secret_seed`] are wrapped in
//! [`Zeroizing`].

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use crate::{
    models::{AccountId, DecoratedSignature, KeypairError},
    utils::{decode_seed, encode_seed},
};

#[derive(Clone)]
pub struct Keypair {
    account_id: AccountId,
    signing_key: Option<SigningKey>,
}

impl Keypair {
    /// Derives the keypair from a raw 32-byte ed25519 seed.
    pub fn from_seed_bytes(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self {
            account_id: AccountId::from_bytes(signing_key.verifying_key().to_bytes()),
            signing_key: Some(signing_key),
        }
    }

    /// Parses an `S...` secret seed.
    pub fn from_secret_seed(seed: &str) -> Result<Self, KeypairError> {
        let raw = Zeroizing::new(decode_seed(seed.trim())?);
        Ok(Self::from_seed_bytes(&raw))
    }

    /// A verification-only keypair for a `G...` address.
    pub fn from_public_key(address: &str) -> Result<Self, KeypairError> {
        Ok(Self::from_account_id(AccountId::from_address(address)?))
    }

    pub fn from_account_id(account_id: AccountId) -> Self {
        Self {
            account_id,
            signing_key: None,
        }
    }

    /// Generates a fresh keypair from the operating system's CSPRNG.
    pub fn random() -> Self {
        let seed = Zeroizing::new(rand::random::<[u8; 32]>());
        Self::from_seed_bytes(&seed)
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn address(&self) -> String {
        self.account_id.address()
    }

    pub fn can_sign(&self) -> bool {
        self.signing_key.is_some()
    }

    pub fn secret_seed(&self) -> Result<Zeroizing<String>, KeypairError> {
        let key = self.signing_key()?;
        let seed = Zeroizing::new(key.to_bytes());
        Ok(Zeroizing::new(encode_seed(&seed)))
    }

    pub fn signature_hint(&self) -> [u8; 4] {
        self.account_id.signature_hint()
    }

    /// Detached ed25519 signature over `data`.
    pub fn sign(&self, data: &[u8]) -> Result<[u8; 64], KeypairError> {
        Ok(self.signing_key()?.sign(data).to_bytes())
    }

    /// Signature tagged with this key's hint, as attached to envelopes.
    pub fn sign_decorated(&self, data: &[u8]) -> Result<DecoratedSignature, KeypairError> {
        let signature = self.sign(data)?;
        Ok(DecoratedSignature::new(self.signature_hint(), signature.to_vec()))
    }

    /// Checks a detached signature against this keypair's public key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(self.account_id.as_bytes()) else {
            return false;
        };
        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };
        verifying_key.verify(data, &signature).is_ok()
    }

    fn signing_key(&self) -> Result<&SigningKey, KeypairError> {
        self.signing_key
            .as_ref()
            .ok_or(KeypairError::MissingSecretKey)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("account_id", &self.account_id)
            .field("can_sign", &self.can_sign())
            .finish()
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.account_id == other.account_id
    }
}

impl Eq for Keypair {}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SEED: [u8; 32] = [
        0x9d, 0x61, 0xb1, 0x9d, 0xef, 0xfd, 0x5a, 0x60, 0xba, 0x84, 0x4a, 0xf4, 0x92, 0xec, 0x2c,
        0xc4, 0x44, 0x49, 0xc5, 0x69, 0x7b, 0x32, 0x69, 0x19, 0x70, 0x3b, 0xac, 0x03, 0x1c, 0xae,
        0x7f, 0x60,
    ];

    #[test]
    fn test_seed_round_trip() {
        let keypair = Keypair::from_seed_bytes(&TEST_SEED);
        let seed = keypair.secret_seed().unwrap();
        assert!(seed.starts_with('S'));

        let restored = Keypair::from_secret_seed(&seed).unwrap();
        assert_eq!(restored.address(), keypair.address());
        assert!(restored.can_sign());
    }

    #[test]
    fn test_address_matches_reference_codec() {
        let keypair = Keypair::from_seed_bytes(&TEST_SEED);
        let public = keypair.account_id().as_bytes();
        assert_eq!(
            keypair.address(),
            stellar_strkey::ed25519::PublicKey(*public).to_string()
        );
    }

    #[test]
    fn test_public_only_keypair_cannot_sign() {
        let signer = Keypair::from_seed_bytes(&TEST_SEED);
        let public = Keypair::from_public_key(&signer.address()).unwrap();
        assert!(!public.can_sign());
        assert_eq!(public.sign(b"data"), Err(KeypairError::MissingSecretKey));
        assert_eq!(public.secret_seed().unwrap_err(), KeypairError::MissingSecretKey);
        assert!(public.sign_decorated(b"data").is_err());
    }

    #[test]
    fn test_signature_verifies() {
        let keypair = Keypair::from_seed_bytes(&TEST_SEED);
        let hash = [5u8; 32];
        let signature = keypair.sign(&hash).unwrap();

        assert!(keypair.verify(&hash, &signature));

        let public = Keypair::from_account_id(*keypair.account_id());
        assert!(public.verify(&hash, &signature));
    }

    #[test]
    fn test_signature_fails_for_other_key_or_mutated_hash() {
        let keypair = Keypair::from_seed_bytes(&TEST_SEED);
        let other = Keypair::random();
        let hash = [5u8; 32];
        let signature = keypair.sign(&hash).unwrap();

        assert!(!other.verify(&hash, &signature));

        let mut mutated = hash;
        mutated[0] ^= 1;
        assert!(!keypair.verify(&mutated, &signature));
        assert!(!keypair.verify(&hash, &signature[..63]));
    }

    #[test]
    fn test_decorated_signature_hint() {
        let keypair = Keypair::from_seed_bytes(&TEST_SEED);
        let decorated = keypair.sign_decorated(b"payload").unwrap();
        assert_eq!(decorated.hint, keypair.account_id().as_bytes()[28..32]);
        assert_eq!(decorated.signature.len(), 64);
        assert!(keypair.verify(b"payload", &decorated.signature));
    }

    #[test]
    fn test_random_keypairs_differ() {
        let first = Keypair::random();
        let second = Keypair::random();
        assert_ne!(first, second);
        assert!(first.can_sign());
    }

    #[test]
    fn test_debug_hides_secret() {
        let keypair = Keypair::from_seed_bytes(&TEST_SEED);
        let debug = format!("{:?}", keypair);
        assert!(debug.contains("can_sign: true"));
        assert!(!debug.contains(keypair.secret_seed().unwrap().as_str()));
    }

    #[test]
    fn test_invalid_seed() {
        assert!(Keypair::from_secret_seed("SABC").is_err());
        let address = Keypair::from_seed_bytes(&TEST_SEED).address();
        assert!(matches!(
            Keypair::from_secret_seed(&address),
            Err(KeypairError::InvalidVersionByte { .. })
        ));
    }
}
