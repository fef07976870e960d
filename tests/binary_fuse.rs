//! Integration tests against the public API: large-sample correctness,
//! false-positive/bits-per-entry bounds, edge cases, and the determinism
//! and precondition guarantees the two build strategies share.

use binary_fuse_filter::{BinaryFuse16, BinaryFuse3, BinaryFuse8, BuildStrategy, Status};
use rand::Rng;

const SAMPLE_SIZE: usize = 1_000_000;

#[test]
fn no_false_negatives_at_scale() {
    let mut rng = rand::thread_rng();
    let keys: Vec<u64> = (0..SAMPLE_SIZE).map(|_| rng.gen()).collect();

    let mut filter = BinaryFuse8::new(keys.len() as u64);
    assert_eq!(filter.add_all(&keys, 0, keys.len()), Status::Ok);

    for key in &keys {
        assert_eq!(filter.contains(*key), Status::Ok);
    }
}

#[test]
fn bits_per_entry_matches_8_bit_budget() {
    let mut rng = rand::thread_rng();
    let keys: Vec<u64> = (0..SAMPLE_SIZE).map(|_| rng.gen()).collect();

    let mut filter = BinaryFuse8::new(keys.len() as u64);
    filter.add_all(&keys, 0, keys.len());

    let bpe = (filter.size_in_bytes() as f64) * 8.0 / (SAMPLE_SIZE as f64);
    assert!(bpe < 9.1, "bits per entry is {bpe}");
}

#[test]
fn false_positive_rate_matches_8_bit_budget() {
    let mut rng = rand::thread_rng();
    let keys: Vec<u64> = (0..SAMPLE_SIZE).map(|_| rng.gen()).collect();

    let mut filter = BinaryFuse8::new(keys.len() as u64);
    filter.add_all(&keys, 0, keys.len());

    let false_positives: usize = (0..SAMPLE_SIZE)
        .map(|_| rng.gen())
        .filter(|n| filter.contains(*n) == Status::Ok)
        .count();
    let fp_rate: f64 = (false_positives * 100) as f64 / SAMPLE_SIZE as f64;
    assert!(fp_rate < 0.406, "false positive rate is {fp_rate}%");
}

#[test]
fn false_positive_rate_matches_16_bit_budget() {
    const SAMPLE: usize = 200_000;
    let mut rng = rand::thread_rng();
    let keys: Vec<u64> = (0..SAMPLE).map(|_| rng.gen()).collect();

    let mut filter = BinaryFuse16::new(keys.len() as u64);
    filter.add_all(&keys, 0, keys.len());

    let false_positives: usize = (0..SAMPLE)
        .map(|_| rng.gen())
        .filter(|n| filter.contains(*n) == Status::Ok)
        .count();
    let fp_rate: f64 = (false_positives * 100) as f64 / SAMPLE as f64;
    assert!(fp_rate < 0.002, "false positive rate is {fp_rate}%");
}

#[test]
fn empty_filter_reports_nothing_found() {
    let mut filter = BinaryFuse8::new(0);
    assert_eq!(filter.add_all(&[], 0, 0), Status::Ok);
    assert_eq!(filter.contains(1), Status::NotFound);
}

#[test]
fn single_key_filter_round_trips() {
    let key: u64 = rand::random();
    let mut filter = BinaryFuse8::new(1);
    assert_eq!(filter.add_all(&[key], 0, 1), Status::Ok);
    assert_eq!(filter.contains(key), Status::Ok);
}

#[test]
#[should_panic(
    expected = "Binary fuse filters must be constructed from a collection containing all distinct keys."
)]
fn duplicate_keys_panic_in_debug_builds() {
    let keys = [1u64, 2, 1];
    let mut filter = BinaryFuse8::new(keys.len() as u64);
    let _ = filter.add_all(&keys, 0, keys.len());
}

#[test]
fn prefetch_and_sorted_strategies_agree_on_membership() {
    let mut rng = rand::thread_rng();
    let keys: Vec<u64> = (0..50_000).map(|_| rng.gen()).collect();

    let mut prefetch = BinaryFuse3::<u8>::with_strategy(keys.len() as u64, BuildStrategy::Prefetch);
    let mut sorted = BinaryFuse3::<u8>::with_strategy(keys.len() as u64, BuildStrategy::Sorted);
    assert_eq!(prefetch.add_all(&keys, 0, keys.len()), Status::Ok);
    assert_eq!(sorted.add_all(&keys, 0, keys.len()), Status::Ok);

    for &key in &keys {
        assert_eq!(prefetch.contains(key), Status::Ok);
        assert_eq!(sorted.contains(key), Status::Ok);
    }
}

#[cfg(feature = "serde")]
#[test]
fn survives_a_bincode_round_trip() {
    let keys: Vec<u64> = (0..10_000u64).map(|i| i.wrapping_mul(0x2545_F491)).collect();
    let mut filter = BinaryFuse8::new(keys.len() as u64);
    filter.add_all(&keys, 0, keys.len());

    let config = bincode::config::standard();
    let bytes = bincode::serde::encode_to_vec(&filter, config).unwrap();
    let (restored, _): (BinaryFuse8, usize) =
        bincode::serde::decode_from_slice(&bytes, config).unwrap();

    for &key in &keys {
        assert_eq!(restored.contains(key), Status::Ok);
    }
}
