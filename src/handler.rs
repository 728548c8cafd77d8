//! Epoch processing: selecting and applying a consistent set of transactions

use crate::transaction::{check_tx, is_valid_tx};
use crate::types::*;
use crate::utxo_pool::UtxoPool;
use log::{debug, trace};

/// ApplyTransaction: 𝒯𝒳 × ℍ × 𝒰𝒫 → 𝒰𝒫
///
/// For an already validated transaction tx with identity h:
/// up' = (up \ {i.prevout : i ∈ tx.inputs}) ∪ {(h, k) ↦ tx.outputs[k] : k ∈ [0, |tx.outputs|)}
pub fn apply_transaction(utxo_pool: &mut UtxoPool, tx: &Transaction, tx_hash: Hash) {
    for input in tx.inputs() {
        utxo_pool.remove(&input.prevout);
    }

    for (i, output) in tx.outputs().iter().enumerate() {
        utxo_pool.add(OutPoint::new(tx_hash, i as Natural), output.clone());
    }
}

/// Validates transactions against, and applies them to, a privately owned UTXO pool.
pub struct TxHandler {
    utxo_pool: UtxoPool,
}

impl TxHandler {
    /// Create a handler over a copy of `utxo_pool`; the caller's pool is never touched
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
        }
    }

    /// Check `tx` against the handler's current pool
    pub fn is_valid_tx(&self, tx: &Transaction) -> bool {
        is_valid_tx(&self.utxo_pool, tx)
    }

    /// HandleTxs: 𝒯𝒳* × 𝒰𝒫 → 𝒯𝒳* × 𝒰𝒫
    ///
    /// Candidates are processed in the given order. Each one is validated against
    /// the pool as left by the candidates accepted before it, and applied right
    /// away when valid, so among conflicting transactions the earliest wins.
    /// Rejected candidates are dropped; the accepted ones are returned in order.
    pub fn handle_txs(&mut self, candidates: &[Transaction]) -> Vec<Transaction> {
        let mut accepted = Vec::new();

        for (i, tx) in candidates.iter().enumerate() {
            let tx_hash = match tx.hash() {
                Some(hash) => *hash,
                None => {
                    debug!("Rejected candidate {}: transaction is not finalized", i);
                    continue;
                }
            };

            match check_tx(&self.utxo_pool, tx) {
                ValidationResult::Valid => {
                    apply_transaction(&mut self.utxo_pool, tx, tx_hash);
                    trace!(
                        "Accepted candidate {} ({} inputs, {} outputs)",
                        i,
                        tx.num_inputs(),
                        tx.num_outputs()
                    );
                    accepted.push(tx.clone());
                }
                ValidationResult::Invalid(reason) => {
                    debug!("Rejected candidate {}: {}", i, reason);
                }
            }
        }

        debug!(
            "Accepted {} of {} candidates, {} outputs now spendable",
            accepted.len(),
            candidates.len(),
            self.utxo_pool.len()
        );
        accepted
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    pub fn into_utxo_pool(self) -> UtxoPool {
        self.utxo_pool
    }
}

impl From<UtxoPool> for TxHandler {
    fn from(utxo_pool: UtxoPool) -> Self {
        Self { utxo_pool }
    }
}
