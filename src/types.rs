//! Core ledger types for UTXO validation

use crate::constants::*;
use crate::error::{ConsensusError, Result};
use bitcoin_hashes::{sha256d, Hash as BitcoinHash, HashEngine};
use secp256k1::{ecdsa::Signature, Message, PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Natural number type
pub type Natural = u64;

/// Integer type
pub type Integer = i64;

/// OutPoint: 𝒪 = ℍ × ℕ
///
/// Identity of an unspent output: the hash of the transaction that created it
/// and the output's position in that transaction's output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: Natural,
}

impl OutPoint {
    pub fn new(hash: Hash, index: Natural) -> Self {
        Self { hash, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.hash {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ":{}", self.index)
    }
}

/// Claim condition of an output: the public key that must authorize any spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimKey(PublicKey);

impl ClaimKey {
    /// Derive the claim key belonging to a secret key
    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        Self(PublicKey::from_secret_key(&secp, secret_key))
    }

    /// Parse a compressed or uncompressed SEC1 public key
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        PublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|e| ConsensusError::InvalidClaimKey(e.to_string()))
    }

    /// Compressed encoding, as written into transaction payloads
    pub fn serialize(&self) -> [u8; CLAIM_KEY_SIZE] {
        self.0.serialize()
    }

    /// Check that `signature` (DER) authorizes `payload` under this key.
    ///
    /// The ECDSA message is SHA-256(payload). Malformed signatures verify as false.
    pub fn verify_signature(&self, payload: &[u8], signature: &[u8]) -> bool {
        let signature = match Signature::from_der(signature) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        let message = signing_message(payload);
        let secp = Secp256k1::verification_only();
        secp.verify_ecdsa(&message, &signature, &self.0).is_ok()
    }
}

/// Produce a DER signature over `payload` that [`ClaimKey::verify_signature`] accepts
pub fn sign_payload(payload: &[u8], secret_key: &SecretKey) -> ByteString {
    let message = signing_message(payload);
    let secp = Secp256k1::signing_only();
    secp.sign_ecdsa(&message, secret_key).serialize_der().to_vec()
}

fn signing_message(payload: &[u8]) -> Message {
    Message::from_digest(Sha256::digest(payload).into())
}

/// Transaction Input: ℐ = 𝒪 × 𝕊
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    /// DER-encoded ECDSA signature over the input's signable payload
    pub signature: ByteString,
}

/// Transaction Output: 𝒯 = ℤ × 𝒦
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: Integer,
    pub claim_key: ClaimKey,
}

impl TransactionOutput {
    pub fn new(value: Integer, claim_key: ClaimKey) -> Self {
        Self { value, claim_key }
    }

    fn encode_into(&self, buf: &mut ByteString) {
        buf.extend_from_slice(&self.value.to_be_bytes());
        buf.extend_from_slice(&self.claim_key.serialize());
    }
}

/// Transaction: 𝒯𝒳 = ℐ* × 𝒯* × ℍ?
///
/// The hash is only set by [`Transaction::finalize`]; every mutation clears it,
/// so a transaction must be finalized again after it is changed. A decoded
/// transaction never keeps the hash it was sent with: it is recomputed from
/// the decoded content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EncodedTransaction")]
pub struct Transaction {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    hash: Option<Hash>,
}

/// Wire form of a transaction; only tells whether the sender had finalized it
#[derive(Deserialize)]
struct EncodedTransaction {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    #[serde(default)]
    hash: Option<Hash>,
}

impl From<EncodedTransaction> for Transaction {
    fn from(encoded: EncodedTransaction) -> Self {
        let mut tx = Transaction {
            inputs: encoded.inputs,
            outputs: encoded.outputs,
            hash: None,
        };
        if encoded.hash.is_some() {
            tx.finalize();
        }
        tx
    }
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unsigned input claiming output `output_index` of `prev_tx_hash`
    pub fn add_input(&mut self, prev_tx_hash: Hash, output_index: Natural) {
        self.inputs.push(TransactionInput {
            prevout: OutPoint::new(prev_tx_hash, output_index),
            signature: ByteString::new(),
        });
        self.hash = None;
    }

    pub fn add_output(&mut self, value: Integer, claim_key: ClaimKey) {
        self.outputs.push(TransactionOutput::new(value, claim_key));
        self.hash = None;
    }

    pub fn remove_input(&mut self, index: usize) -> Result<TransactionInput> {
        self.check_input_index(index)?;
        self.hash = None;
        Ok(self.inputs.remove(index))
    }

    /// Remove the first input claiming `outpoint`
    pub fn remove_input_by_outpoint(&mut self, outpoint: &OutPoint) -> Option<TransactionInput> {
        let position = self.inputs.iter().position(|input| &input.prevout == outpoint)?;
        self.hash = None;
        Some(self.inputs.remove(position))
    }

    pub fn add_signature(&mut self, signature: ByteString, index: usize) -> Result<()> {
        self.check_input_index(index)?;
        self.inputs[index].signature = signature;
        self.hash = None;
        Ok(())
    }

    /// Sign input `index` with `secret_key` and store the signature on that input
    pub fn sign_input(&mut self, index: usize, secret_key: &SecretKey) -> Result<()> {
        let payload = self.raw_data_to_sign(index)?;
        let signature = sign_payload(&payload, secret_key);
        self.add_signature(signature, index)
    }

    /// Signable payload for input `index`.
    ///
    /// prevout hash || prevout index (u64 BE), then for every output
    /// value (i64 BE) || compressed claim key. No signature bytes are included.
    pub fn raw_data_to_sign(&self, index: usize) -> Result<ByteString> {
        self.check_input_index(index)?;
        let prevout = &self.inputs[index].prevout;

        let mut buf = ByteString::with_capacity(
            SIGNABLE_INPUT_SIZE + self.outputs.len() * ENCODED_OUTPUT_SIZE,
        );
        buf.extend_from_slice(&prevout.hash);
        buf.extend_from_slice(&prevout.index.to_be_bytes());
        for output in &self.outputs {
            output.encode_into(&mut buf);
        }
        Ok(buf)
    }

    /// Full encoding of the transaction, signatures included
    pub fn raw_tx(&self) -> ByteString {
        let signature_bytes: usize = self.inputs.iter().map(|i| i.signature.len()).sum();
        let mut buf = ByteString::with_capacity(
            2 * LEN_PREFIX_SIZE
                + self.inputs.len() * (SIGNABLE_INPUT_SIZE + LEN_PREFIX_SIZE)
                + signature_bytes
                + self.outputs.len() * ENCODED_OUTPUT_SIZE,
        );

        buf.extend_from_slice(&(self.inputs.len() as u64).to_be_bytes());
        for input in &self.inputs {
            buf.extend_from_slice(&input.prevout.hash);
            buf.extend_from_slice(&input.prevout.index.to_be_bytes());
            buf.extend_from_slice(&(input.signature.len() as u64).to_be_bytes());
            buf.extend_from_slice(&input.signature);
        }

        buf.extend_from_slice(&(self.outputs.len() as u64).to_be_bytes());
        for output in &self.outputs {
            output.encode_into(&mut buf);
        }
        buf
    }

    /// Fix the transaction identity: SHA256d(raw_tx)
    pub fn finalize(&mut self) -> Hash {
        let hash = self.content_hash();
        self.hash = Some(hash);
        hash
    }

    fn content_hash(&self) -> Hash {
        let mut engine = sha256d::Hash::engine();
        engine.input(&self.raw_tx());
        let result = sha256d::Hash::from_engine(engine);
        let mut hash = [0u8; HASH_SIZE];
        hash.copy_from_slice(&result);
        hash
    }

    /// Identity of the transaction, `None` until finalized
    pub fn hash(&self) -> Option<&Hash> {
        self.hash.as_ref()
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<&TransactionInput> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&TransactionOutput> {
        self.outputs.get(index)
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    fn check_input_index(&self, index: usize) -> Result<()> {
        if index < self.inputs.len() {
            Ok(())
        } else {
            Err(ConsensusError::InputIndexOutOfRange {
                index,
                len: self.inputs.len(),
            })
        }
    }
}

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}
