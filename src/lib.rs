//! # UTXO-Consensus
//!
//! Validation of transactions against a pool of unspent transaction outputs,
//! and selection of a mutually consistent subset from a batch of candidates.
//!
//! The crate enforces that value cannot be created, spent twice, or spent
//! without the authorization of the key recorded on the claimed output.
//!
//! ## Architecture
//!
//! - [`utxo_pool::UtxoPool`]: the spendable outputs, keyed by [`types::OutPoint`]
//! - [`transaction`]: pure, read-only validation of one transaction against a pool
//! - [`handler::TxHandler`]: owns a pool and applies batches of candidates in order
//!
//! ## Usage
//!
//! ```rust
//! use utxo_consensus::*;
//! use secp256k1::SecretKey;
//!
//! let alice = SecretKey::from_slice(&[1u8; 32]).unwrap();
//! let bob = SecretKey::from_slice(&[2u8; 32]).unwrap();
//!
//! // Seed pool: one output of 10 claimable by alice
//! let genesis = OutPoint::new([7u8; 32], 0);
//! let mut pool = UtxoPool::new();
//! pool.add(genesis, TransactionOutput::new(10, ClaimKey::from_secret_key(&alice)));
//!
//! // Alice pays bob 10
//! let mut tx = Transaction::new();
//! tx.add_input(genesis.hash, genesis.index);
//! tx.add_output(10, ClaimKey::from_secret_key(&bob));
//! tx.sign_input(0, &alice).unwrap();
//! let tx_hash = tx.finalize();
//!
//! let mut handler = TxHandler::new(&pool);
//! assert!(handler.is_valid_tx(&tx));
//!
//! let accepted = handler.handle_txs(&[tx]);
//! assert_eq!(accepted.len(), 1);
//! assert!(!handler.utxo_pool().contains(&genesis));
//! assert!(handler.utxo_pool().contains(&OutPoint::new(tx_hash, 0)));
//! ```

pub mod constants;
pub mod error;
pub mod handler;
pub mod transaction;
pub mod types;
pub mod utxo_pool;

// Re-export commonly used types
pub use constants::*;
pub use error::{ConsensusError, Result};
pub use handler::{apply_transaction, TxHandler};
pub use transaction::{check_tx, is_valid_tx};
pub use types::*;
pub use utxo_pool::{UtxoEntry, UtxoPool};
