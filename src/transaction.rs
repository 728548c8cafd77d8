//! Transaction validation against a UTXO pool

use crate::types::*;
use crate::utxo_pool::UtxoPool;
use std::collections::HashSet;

/// CheckTx: 𝒰𝒫 × 𝒯𝒳 → {valid, invalid}
///
/// A transaction tx = (ins, outs) is valid against pool up if and only if:
/// 1. ∀i ∈ ins: i.prevout ∈ dom(up)
/// 2. ∀(k, i) ∈ enumerate(ins): up(i.prevout).key verifies i.signature over RawDataToSign(tx, k)
/// 3. no two inputs claim the same prevout
/// 4. ∀o ∈ outs: o.value ≥ 0
/// 5. Σᵢ up(i.prevout).value ≥ Σₒ o.value
///
/// Conditions 1-3 are checked input by input, so the first failing input decides
/// the reason. The pool is never modified.
pub fn check_tx(utxo_pool: &UtxoPool, tx: &Transaction) -> ValidationResult {
    let mut claimed: HashSet<&OutPoint> = HashSet::with_capacity(tx.num_inputs());
    let mut total_input_value = 0i64;

    for (i, input) in tx.inputs().iter().enumerate() {
        // 1. Claimed output must be spendable
        let utxo = match utxo_pool.get(&input.prevout) {
            Some(utxo) => utxo,
            None => {
                return ValidationResult::Invalid(format!(
                    "Input {} claims {} which is not in the UTXO pool",
                    i, input.prevout
                ))
            }
        };

        // 2. Signature must verify under the claim key recorded in the pool
        let payload = match tx.raw_data_to_sign(i) {
            Ok(payload) => payload,
            Err(e) => return ValidationResult::Invalid(e.to_string()),
        };
        if !utxo.claim_key.verify_signature(&payload, &input.signature) {
            return ValidationResult::Invalid(format!("Invalid signature at input {}", i));
        }

        // 3. No output claimed twice within this transaction
        if !claimed.insert(&input.prevout) {
            return ValidationResult::Invalid(format!(
                "Input {} claims {} more than once",
                i, input.prevout
            ));
        }

        total_input_value = match total_input_value.checked_add(utxo.value) {
            Some(total) => total,
            None => return ValidationResult::Invalid("Input value overflow".to_string()),
        };
    }

    // 4. Output values must be non-negative
    for (i, output) in tx.outputs().iter().enumerate() {
        if output.value < 0 {
            return ValidationResult::Invalid(format!(
                "Negative output value {} at index {}",
                output.value, i
            ));
        }
    }

    // 5. Totals are compared only once both are fully accumulated
    let total_output_value = match tx
        .outputs()
        .iter()
        .try_fold(0i64, |acc, output| acc.checked_add(output.value))
    {
        Some(total) => total,
        None => return ValidationResult::Invalid("Output value overflow".to_string()),
    };

    if total_input_value < total_output_value {
        return ValidationResult::Invalid(format!(
            "Outputs total {} exceeds inputs total {}",
            total_output_value, total_input_value
        ));
    }

    ValidationResult::Valid
}

/// IsValidTx: 𝒰𝒫 × 𝒯𝒳 → {true, false}
pub fn is_valid_tx(utxo_pool: &UtxoPool, tx: &Transaction) -> bool {
    check_tx(utxo_pool, tx).is_valid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::SecretKey;

    fn secret(seed: u8) -> SecretKey {
        SecretKey::from_slice(&[seed; 32]).unwrap()
    }

    fn key(seed: u8) -> ClaimKey {
        ClaimKey::from_secret_key(&secret(seed))
    }

    /// Pool holding (prev, 0) = 10 and (prev, 1) = 4, both claimable by key 1
    fn setup_pool() -> (UtxoPool, Hash) {
        let prev = [0x11; 32];
        let mut pool = UtxoPool::new();
        pool.add(OutPoint::new(prev, 0), TransactionOutput::new(10, key(1)));
        pool.add(OutPoint::new(prev, 1), TransactionOutput::new(4, key(1)));
        (pool, prev)
    }

    fn spend(prevouts: &[(Hash, Natural)], outputs: &[Integer], signer: u8) -> Transaction {
        let mut tx = Transaction::new();
        for (hash, index) in prevouts {
            tx.add_input(*hash, *index);
        }
        for value in outputs {
            tx.add_output(*value, key(2));
        }
        for i in 0..tx.num_inputs() {
            tx.sign_input(i, &secret(signer)).unwrap();
        }
        tx.finalize();
        tx
    }

    #[test]
    fn test_check_tx_valid() {
        let (pool, prev) = setup_pool();
        let tx = spend(&[(prev, 0)], &[10], 1);
        assert_eq!(check_tx(&pool, &tx), ValidationResult::Valid);
    }

    #[test]
    fn test_check_tx_missing_utxo() {
        let (pool, prev) = setup_pool();
        let tx = spend(&[(prev, 7)], &[1], 1);
        assert!(matches!(check_tx(&pool, &tx), ValidationResult::Invalid(_)));
    }

    #[test]
    fn test_check_tx_wrong_signer() {
        let (pool, prev) = setup_pool();
        let tx = spend(&[(prev, 0)], &[10], 2);
        assert!(!is_valid_tx(&pool, &tx));
    }

    #[test]
    fn test_check_tx_unsigned() {
        let (pool, prev) = setup_pool();
        let mut tx = Transaction::new();
        tx.add_input(prev, 0);
        tx.add_output(1, key(2));
        tx.finalize();
        assert!(!is_valid_tx(&pool, &tx));
    }

    #[test]
    fn test_check_tx_double_claim() {
        let (pool, prev) = setup_pool();
        let tx = spend(&[(prev, 0), (prev, 0)], &[1], 1);
        match check_tx(&pool, &tx) {
            ValidationResult::Invalid(reason) => assert!(reason.contains("more than once")),
            ValidationResult::Valid => panic!("double claim accepted"),
        }
    }

    #[test]
    fn test_check_tx_negative_output() {
        let (pool, prev) = setup_pool();
        // Conservation would hold: 10 >= 12 + (-3)
        let tx = spend(&[(prev, 0)], &[12, -3], 1);
        assert!(!is_valid_tx(&pool, &tx));
    }

    #[test]
    fn test_check_tx_overspend() {
        let (pool, prev) = setup_pool();
        let tx = spend(&[(prev, 0), (prev, 1)], &[8, 7], 1);
        assert!(!is_valid_tx(&pool, &tx));
    }

    #[test]
    fn test_check_tx_exact_spend() {
        let (pool, prev) = setup_pool();
        // 14 in, 14 out
        let tx = spend(&[(prev, 0), (prev, 1)], &[14, 0], 1);
        assert!(is_valid_tx(&pool, &tx));

        let tx = spend(&[(prev, 0), (prev, 1)], &[0, 0, 14], 1);
        assert!(is_valid_tx(&pool, &tx));
    }

    #[test]
    fn test_check_tx_fee_allowed() {
        let (pool, prev) = setup_pool();
        let tx = spend(&[(prev, 0)], &[3], 1);
        assert!(is_valid_tx(&pool, &tx));
    }

    #[test]
    fn test_check_tx_output_overflow() {
        let (pool, prev) = setup_pool();
        let tx = spend(&[(prev, 0)], &[i64::MAX, i64::MAX], 1);
        assert!(!is_valid_tx(&pool, &tx));
    }

    #[test]
    fn test_check_tx_does_not_mutate_pool() {
        let (pool, prev) = setup_pool();
        let snapshot = pool.clone();
        let tx = spend(&[(prev, 0)], &[10], 1);

        let first = check_tx(&pool, &tx);
        let second = check_tx(&pool, &tx);
        assert_eq!(first, second);
        assert_eq!(pool, snapshot);
    }
}
