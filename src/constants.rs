//! Encoding constants for transaction payloads

/// Size of a transaction hash in bytes
pub const HASH_SIZE: usize = 32;

/// Size of an encoded prevout index (u64, big-endian)
pub const OUTPUT_INDEX_SIZE: usize = 8;

/// Size of an encoded output value (i64, big-endian)
pub const VALUE_SIZE: usize = 8;

/// Size of a compressed secp256k1 public key
pub const CLAIM_KEY_SIZE: usize = 33;

/// Size of the length and count prefixes used by the raw transaction (u64, big-endian)
pub const LEN_PREFIX_SIZE: usize = 8;

/// Encoded size of one input in the signable payload
pub const SIGNABLE_INPUT_SIZE: usize = HASH_SIZE + OUTPUT_INDEX_SIZE;

/// Encoded size of one output in any payload
pub const ENCODED_OUTPUT_SIZE: usize = VALUE_SIZE + CLAIM_KEY_SIZE;
