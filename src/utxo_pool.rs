//! The pool of currently spendable outputs

use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// UTXO Pool: 𝒰𝒫 = 𝒪 → 𝒯
///
/// Every entry is an output of a previously accepted transaction that has not
/// been consumed yet. Cloning yields an independent deep copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<UtxoEntry>", into = "Vec<UtxoEntry>")]
pub struct UtxoPool {
    utxos: HashMap<OutPoint, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    /// Output stored under `outpoint`, `None` if it is not (or no longer) spendable
    pub fn get(&self, outpoint: &OutPoint) -> Option<&TransactionOutput> {
        self.utxos.get(outpoint)
    }

    /// Insert or overwrite the entry for `outpoint`
    pub fn add(&mut self, outpoint: OutPoint, output: TransactionOutput) {
        self.utxos.insert(outpoint, output);
    }

    /// Remove the entry for `outpoint`; removing an absent entry is a no-op
    pub fn remove(&mut self, outpoint: &OutPoint) -> Option<TransactionOutput> {
        self.utxos.remove(outpoint)
    }

    /// All spendable outpoints, in no particular order
    pub fn list_all(&self) -> Vec<OutPoint> {
        self.utxos.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Sum of all spendable values, `None` on overflow
    pub fn total_value(&self) -> Option<Integer> {
        self.utxos
            .values()
            .try_fold(0i64, |acc, output| acc.checked_add(output.value))
    }
}

/// Serialized form of one pool entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub outpoint: OutPoint,
    pub output: TransactionOutput,
}

impl From<Vec<UtxoEntry>> for UtxoPool {
    fn from(entries: Vec<UtxoEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.outpoint, entry.output))
            .collect()
    }
}

impl From<UtxoPool> for Vec<UtxoEntry> {
    fn from(pool: UtxoPool) -> Self {
        pool.utxos
            .into_iter()
            .map(|(outpoint, output)| UtxoEntry { outpoint, output })
            .collect()
    }
}

impl FromIterator<(OutPoint, TransactionOutput)> for UtxoPool {
    fn from_iter<I: IntoIterator<Item = (OutPoint, TransactionOutput)>>(iter: I) -> Self {
        Self {
            utxos: iter.into_iter().collect(),
        }
    }
}
