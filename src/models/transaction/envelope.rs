use std::fmt;

use sha2::{Digest, Sha256};
use strum::Display;
use tracing::debug;

use crate::{
    constants::{
        ENVELOPE_TYPE_TX, STELLAR_DEFAULT_TRANSACTION_FEE, STELLAR_MAX_OPERATIONS,
        STELLAR_MAX_SIGNATURES,
    },
    models::{
        AccountId, DecoratedSignature, Keypair, Memo, Operation, TimeBounds, TransactionError,
        XdrError,
    },
    xdr::{XdrDecode, XdrEncode, XdrReader, XdrWriter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TransactionStatus {
    /// Operations may still be added.
    Building,
    /// One or more signatures are attached.
    Signed,
    /// Handed to the network; no further changes.
    Submitted,
}

/// An atomic batch of operations issued by one source account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    source_account: AccountId,
    fee: Option<u32>,
    base_fee: u32,
    sequence: i64,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operations: Vec<Operation>,
    signatures: Vec<DecoratedSignature>,
    status: TransactionStatus,
}

impl Transaction {
    pub fn new(source_account: AccountId) -> Self {
        Self {
            source_account,
            fee: None,
            base_fee: STELLAR_DEFAULT_TRANSACTION_FEE,
            sequence: 0,
            time_bounds: None,
            memo: Memo::None,
            operations: Vec::new(),
            signatures: Vec::new(),
            status: TransactionStatus::Building,
        }
    }

    pub fn with_base_fee(mut self, base_fee: u32) -> Self {
        self.base_fee = base_fee;
        self
    }

    /// Overrides the computed fee with a fixed total.
    pub fn with_fee(mut self, fee: u32) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn with_time_bounds(mut self, time_bounds: TimeBounds) -> Self {
        self.time_bounds = Some(time_bounds);
        self
    }

    pub fn with_memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Result<Self, TransactionError> {
        self.add_operation(operation)?;
        Ok(self)
    }

    pub fn source_account(&self) -> &AccountId {
        &self.source_account
    }

    pub fn sequence(&self) -> i64 {
        self.sequence
    }

    pub fn time_bounds(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn signatures(&self) -> &[DecoratedSignature] {
        &self.signatures
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Total fee: the override if set, otherwise base fee per operation.
    pub fn fee(&self) -> u32 {
        self.fee.unwrap_or_else(|| {
            self.base_fee
                .saturating_mul(u32::try_from(self.operations.len()).unwrap_or(u32::MAX))
        })
    }

    pub fn add_operation(&mut self, operation: Operation) -> Result<(), TransactionError> {
        self.ensure_status(TransactionStatus::Building)?;
        if self.operations.len() >= STELLAR_MAX_OPERATIONS {
            return Err(TransactionError::TooManyOperations(STELLAR_MAX_OPERATIONS));
        }
        self.operations.push(operation);
        Ok(())
    }

    /// Sets the sequence number the envelope is signed with. Only allowed
    /// before signing, since it changes the hash.
    pub fn set_sequence(&mut self, sequence: i64) -> Result<(), TransactionError> {
        self.ensure_status(TransactionStatus::Building)?;
        self.sequence = sequence;
        Ok(())
    }

    /// Hash the network signs: SHA-256 of the network id, the envelope type
    /// and the unsigned transaction body.
    pub fn hash(&self, network_passphrase: &str) -> Result<[u8; 32], TransactionError> {
        let mut writer = XdrWriter::new();
        writer.write_sha256_of(network_passphrase.as_bytes());
        writer.write_i32(ENVELOPE_TYPE_TX);
        self.encode_body(&mut writer)?;
        Ok(Sha256::digest(writer.as_bytes()).into())
    }

    pub fn hash_hex(&self, network_passphrase: &str) -> Result<String, TransactionError> {
        Ok(hex::encode(self.hash(network_passphrase)?))
    }

    /// Appends one decorated signature per signer. Existing signatures are
    /// kept; call [`Transaction::clear_signatures`] before re-signing.
    pub fn sign(
        &mut self,
        signers: &[&Keypair],
        network_passphrase: &str,
    ) -> Result<(), TransactionError> {
        if self.status == TransactionStatus::Submitted {
            return Err(TransactionError::InvalidState {
                expected: TransactionStatus::Signed,
                actual: self.status,
            });
        }
        if signers.is_empty() {
            return Err(TransactionError::NoSigners);
        }
        if self.operations.is_empty() {
            return Err(TransactionError::MissingOperation);
        }
        if self.signatures.len() + signers.len() > STELLAR_MAX_SIGNATURES {
            return Err(XdrError::LengthExceedsMax {
                length: self.signatures.len() + signers.len(),
                max: STELLAR_MAX_SIGNATURES,
            }
            .into());
        }

        let hash = self.hash(network_passphrase)?;
        let mut signatures = Vec::with_capacity(signers.len());
        for signer in signers {
            signatures.push(signer.sign_decorated(&hash)?);
        }
        self.signatures.extend(signatures);
        self.status = TransactionStatus::Signed;

        debug!(
            source = %self.source_account,
            sequence = self.sequence,
            signatures = self.signatures.len(),
            "transaction signed"
        );
        Ok(())
    }

    /// Whether `keypair` produced one of the attached signatures.
    pub fn is_signed_by(
        &self,
        keypair: &Keypair,
        network_passphrase: &str,
    ) -> Result<bool, TransactionError> {
        let hash = self.hash(network_passphrase)?;
        let hint = keypair.signature_hint();
        Ok(self
            .signatures
            .iter()
            .any(|s| s.hint == hint && keypair.verify(&hash, &s.signature)))
    }

    /// Drops every signature and returns the transaction to building.
    pub fn clear_signatures(&mut self) -> Result<(), TransactionError> {
        if self.status == TransactionStatus::Submitted {
            return Err(TransactionError::InvalidState {
                expected: TransactionStatus::Signed,
                actual: self.status,
            });
        }
        self.signatures.clear();
        self.status = TransactionStatus::Building;
        Ok(())
    }

    pub fn mark_submitted(&mut self) -> Result<(), TransactionError> {
        self.ensure_status(TransactionStatus::Signed)?;
        self.status = TransactionStatus::Submitted;
        Ok(())
    }

    /// Signed envelope in the base64 form the submission endpoint accepts.
    pub fn to_envelope_xdr_base64(&self) -> Result<String, TransactionError> {
        if self.signatures.is_empty() {
            return Err(TransactionError::InvalidState {
                expected: TransactionStatus::Signed,
                actual: self.status,
            });
        }
        Ok(self.to_xdr_base64()?)
    }

    pub fn from_envelope_xdr_base64(envelope: &str) -> Result<Self, XdrError> {
        Self::from_xdr_base64(envelope)
    }

    fn ensure_status(&self, expected: TransactionStatus) -> Result<(), TransactionError> {
        if self.status != expected {
            return Err(TransactionError::InvalidState {
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }

    fn encode_body(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.source_account.encode(writer)?;
        writer.write_u32(self.fee());
        writer.write_i64(self.sequence);
        writer.write_optional(self.time_bounds.as_ref())?;
        self.memo.encode(writer)?;
        if self.operations.len() > STELLAR_MAX_OPERATIONS {
            return Err(XdrError::LengthExceedsMax {
                length: self.operations.len(),
                max: STELLAR_MAX_OPERATIONS,
            });
        }
        writer.write_u32(self.operations.len() as u32);
        for operation in &self.operations {
            operation.encode(writer)?;
        }
        // ext
        writer.write_i32(0);
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction ({})", self.status)?;
        writeln!(f, " - Account = {}", self.source_account)?;
        writeln!(f, " - Fee = {}", self.fee())?;
        writeln!(f, " - Sequence number = {}", self.sequence)?;
        match &self.time_bounds {
            Some(bounds) => writeln!(f, " - Time bounds = {}", bounds)?,
            None => writeln!(f, " - Time bounds = (none)")?,
        }
        writeln!(f, " - Memo = {}", self.memo)?;
        writeln!(f, " - Operations (count: {}):", self.operations.len())?;
        for operation in &self.operations {
            writeln!(f, "     {}", operation)?;
        }
        writeln!(f, " - Signatures (count: {}):", self.signatures.len())?;
        for signature in &self.signatures {
            writeln!(f, "     * {}", signature)?;
        }
        Ok(())
    }
}

/// The envelope: transaction body followed by its signatures.
impl XdrEncode for Transaction {
    fn encode(&self, writer: &mut XdrWriter) -> Result<(), XdrError> {
        self.encode_body(writer)?;
        if self.signatures.len() > STELLAR_MAX_SIGNATURES {
            return Err(XdrError::LengthExceedsMax {
                length: self.signatures.len(),
                max: STELLAR_MAX_SIGNATURES,
            });
        }
        writer.write_u32(self.signatures.len() as u32);
        for signature in &self.signatures {
            signature.encode(writer)?;
        }
        Ok(())
    }
}

impl XdrDecode for Transaction {
    fn decode(reader: &mut XdrReader<'_>) -> Result<Self, XdrError> {
        let source_account = AccountId::decode(reader)?;
        let fee = reader.read_u32()?;
        let sequence = reader.read_i64()?;
        let time_bounds = reader.read_optional::<TimeBounds>()?;
        let memo = Memo::decode(reader)?;

        let count = reader.read_length(Some(STELLAR_MAX_OPERATIONS))?;
        let mut operations = Vec::with_capacity(count);
        for _ in 0..count {
            operations.push(Operation::decode(reader)?);
        }

        let ext = reader.read_i32()?;
        if ext != 0 {
            return Err(XdrError::InvalidDiscriminant {
                kind: "TransactionExt",
                value: ext,
            });
        }

        let count = reader.read_length(Some(STELLAR_MAX_SIGNATURES))?;
        let mut signatures = Vec::with_capacity(count);
        for _ in 0..count {
            signatures.push(DecoratedSignature::decode(reader)?);
        }

        let status = if signatures.is_empty() {
            TransactionStatus::Building
        } else {
            TransactionStatus::Signed
        };

        Ok(Self {
            source_account,
            fee: Some(fee),
            base_fee: STELLAR_DEFAULT_TRANSACTION_FEE,
            sequence,
            time_bounds,
            memo,
            operations,
            signatures,
            status,
        })
    }
}
