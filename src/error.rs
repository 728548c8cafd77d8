//! Error types for transaction construction

use thiserror::Error;

/// Errors raised while building a transaction.
///
/// An invalid transaction is not an error: validation reports it through
/// [`crate::types::ValidationResult`] or a plain `bool`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    #[error("Input index {index} out of range for transaction with {len} inputs")]
    InputIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid claim key: {0}")]
    InvalidClaimKey(String),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
