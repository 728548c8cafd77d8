//! Integration tests for single-transaction validation

use secp256k1::SecretKey;
use utxo_consensus::*;

fn secret(seed: u8) -> SecretKey {
    SecretKey::from_slice(&[seed; 32]).unwrap()
}

fn key(seed: u8) -> ClaimKey {
    ClaimKey::from_secret_key(&secret(seed))
}

/// Pool with u1 = 10 claimable by K (seed 1)
fn setup() -> (UtxoPool, OutPoint) {
    let u1 = OutPoint::new([0xaa; 32], 0);
    let mut pool = UtxoPool::new();
    pool.add(u1, TransactionOutput::new(10, key(1)));
    (pool, u1)
}

fn pay(from: OutPoint, value: Integer, signer: u8) -> Transaction {
    let mut tx = Transaction::new();
    tx.add_input(from.hash, from.index);
    tx.add_output(value, key(2));
    tx.sign_input(0, &secret(signer)).unwrap();
    tx.finalize();
    tx
}

#[test]
fn test_conservation_example() {
    let (pool, u1) = setup();
    let tx1 = pay(u1, 10, 1);
    assert!(is_valid_tx(&pool, &tx1));
}

#[test]
fn test_negative_output_example() {
    let (pool, u1) = setup();
    let tx2 = pay(u1, -1, 1);
    assert!(!is_valid_tx(&pool, &tx2));
}

#[test]
fn test_overspend_example() {
    let (pool, u1) = setup();
    let tx3 = pay(u1, 11, 1);
    assert!(!is_valid_tx(&pool, &tx3));
}

#[test]
fn test_missing_input_invalid() {
    let (pool, u1) = setup();
    let mut tx = Transaction::new();
    tx.add_input(u1.hash, u1.index);
    tx.add_input([0xbb; 32], 0);
    tx.add_output(1, key(2));
    tx.sign_input(0, &secret(1)).unwrap();
    tx.sign_input(1, &secret(1)).unwrap();
    tx.finalize();

    assert!(matches!(check_tx(&pool, &tx), ValidationResult::Invalid(_)));
}

#[test]
fn test_double_claim_invalid_regardless_of_signatures() {
    let (pool, u1) = setup();

    let mut signed = Transaction::new();
    signed.add_input(u1.hash, u1.index);
    signed.add_input(u1.hash, u1.index);
    signed.add_output(1, key(2));
    signed.sign_input(0, &secret(1)).unwrap();
    signed.sign_input(1, &secret(1)).unwrap();
    signed.finalize();
    assert!(!is_valid_tx(&pool, &signed));

    let mut unsigned = signed.clone();
    unsigned.add_signature(vec![], 1).unwrap();
    unsigned.finalize();
    assert!(!is_valid_tx(&pool, &unsigned));
}

#[test]
fn test_signature_checked_against_pool_key() {
    let (pool, u1) = setup();

    // Spender signs with its own key and points the output at itself;
    // only the key recorded on u1 may authorize the spend.
    let forged = pay(u1, 10, 2);
    assert!(!is_valid_tx(&pool, &forged));
}

#[test]
fn test_signature_covers_outputs() {
    let (pool, u1) = setup();
    let mut tx = pay(u1, 5, 1);

    // Adding an output after signing invalidates the signature
    tx.add_output(5, key(3));
    tx.finalize();
    assert!(!is_valid_tx(&pool, &tx));
}

#[test]
fn test_empty_transaction_is_valid() {
    let (pool, _) = setup();
    let mut tx = Transaction::new();
    tx.finalize();
    assert!(is_valid_tx(&pool, &tx));
}

#[test]
fn test_validation_is_repeatable_and_read_only() {
    let (pool, u1) = setup();
    let before = pool.clone();

    for tx in [pay(u1, 10, 1), pay(u1, 11, 1), pay(u1, 10, 2)] {
        let first = is_valid_tx(&pool, &tx);
        for _ in 0..3 {
            assert_eq!(is_valid_tx(&pool, &tx), first);
        }
    }
    assert_eq!(pool, before);
}
