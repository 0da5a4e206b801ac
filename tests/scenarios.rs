use hll_compat::{EstimatorError, HyperLogLog, Mode, Murmur2, ObservationHasher, WyHasher};
use test_case::test_case;

/// Dense snapshot of a P = 4 estimator which has seen the integers 1 and 2.
const DENSE_P4_ONE_TWO: [u8; 20] = [0, 0, 0, 4, 0, 0, 0, 12, 2, 0, 0, 0, 0, 0, 8, 0, 0, 0, 0, 0];

#[test]
fn test_small_set_is_exact() {
    let mut hll: HyperLogLog = HyperLogLog::new(16).unwrap();
    for i in [0i64, 1, 2, 3, 16, 17, 18, 19, 19] {
        hll.offer(&i);
    }
    assert_eq!(hll.mode(), Mode::Explicit);
    assert_eq!(hll.cardinality(), 8);
}

#[test]
fn test_reference_dense_snapshot() {
    let mut hll: HyperLogLog = HyperLogLog::new(4).unwrap();
    hll.offer(&1i64);
    hll.offer(&2i64);
    assert_eq!(hll.cardinality(), 2);
    assert_eq!(hll.serialize(), DENSE_P4_ONE_TWO);
    assert_eq!(hll.serialize_dense(), DENSE_P4_ONE_TWO);
}

#[test]
fn test_restore_reference_snapshot_and_continue() {
    let mut hll: HyperLogLog = HyperLogLog::unserialize(&DENSE_P4_ONE_TWO).unwrap();
    assert_eq!(hll.precision(), 4);
    assert_eq!(hll.mode(), Mode::Dense);
    assert_eq!(hll.cardinality(), 2);

    // values already folded into the snapshot leave it unchanged
    assert!(!hll.offer(&1i64));
    assert!(!hll.offer(&2i64));
    assert_eq!(hll.cardinality(), 2);

    assert!(hll.offer(&3i64));
    assert_eq!(hll.cardinality(), 3);
}

#[test]
fn test_explicit_snapshot_expands_to_reference_layout() {
    let mut hll: HyperLogLog = HyperLogLog::new(10).unwrap();
    for i in 0..50i64 {
        hll.offer(&i);
    }
    assert_eq!(hll.mode(), Mode::Explicit);

    let explicit = hll.serialize();
    let dense = hll.serialize_dense();
    assert_eq!(explicit.len(), 8 + 1 + 50 * 8);
    assert_eq!(dense.len(), 8 + 171 * 4);
    assert!(explicit.len() < dense.len());

    let from_explicit: HyperLogLog = HyperLogLog::unserialize(&explicit).unwrap();
    let from_dense: HyperLogLog = HyperLogLog::unserialize(&dense).unwrap();
    assert_eq!(from_explicit, hll);
    assert_eq!(from_dense.mode(), Mode::Dense);
    assert_eq!(from_dense.cardinality(), 50);
}

#[test_case(4, 0)]
#[test_case(4, 1)]
#[test_case(4, 50)]
#[test_case(10, 85)]
#[test_case(10, 86)]
#[test_case(14, 20_000)]
fn test_round_trip(precision: u8, n: u64) {
    let mut hll: HyperLogLog = HyperLogLog::new(precision).unwrap();
    for i in 0..n {
        hll.offer(&format!("user-{i}"));
    }
    let mut restored: HyperLogLog = HyperLogLog::unserialize(&hll.serialize()).unwrap();
    assert_eq!(restored, hll);
    assert_eq!(restored.cardinality(), hll.cardinality());
    assert_eq!(restored.serialize(), hll.serialize());

    // both copies keep evolving identically, including across promotion
    for i in n / 2..n + 500 {
        let value = format!("user-{i}");
        assert_eq!(restored.offer(&value), hll.offer(&value));
        assert_eq!(restored.cardinality(), hll.cardinality());
    }
    assert_eq!(restored, hll);
    assert_eq!(restored.serialize(), hll.serialize());
}

#[test]
fn test_merge_different_precisions() {
    let mut p10: HyperLogLog = HyperLogLog::new(10).unwrap();
    let p12: HyperLogLog = HyperLogLog::new(12).unwrap();
    assert_eq!(
        p10.merge(&p12),
        Err(EstimatorError::PrecisionMismatch {
            expected: 10,
            found: 12
        })
    );
}

#[test]
fn test_merge_overlapping_streams() {
    let mut lhs: HyperLogLog = HyperLogLog::new(14).unwrap();
    let mut rhs: HyperLogLog = HyperLogLog::new(14).unwrap();
    let mut union: HyperLogLog = HyperLogLog::new(14).unwrap();
    for i in 0..30_000i64 {
        lhs.offer(&i);
        union.offer(&i);
    }
    for i in 20_000..50_000i64 {
        rhs.offer(&i);
        union.offer(&i);
    }

    let mut merged = lhs.clone();
    merged.merge(&rhs).unwrap();
    assert_eq!(merged, union);

    let mut merged_rev = rhs.clone();
    merged_rev.merge(&lhs).unwrap();
    assert_eq!(merged_rev, union);

    let error = (merged.cardinality() as f64 - 50_000.0).abs() / 50_000.0;
    assert!(error < 0.05, "relative error {error} is too high");
}

#[test]
fn test_merge_is_idempotent() {
    let mut hll: HyperLogLog = HyperLogLog::new(8).unwrap();
    for i in 0..1000i64 {
        hll.offer(&i);
    }
    let snapshot = hll.clone();
    hll.merge(&snapshot).unwrap();
    assert_eq!(hll, snapshot);
}

#[test]
fn test_integer_widths_hash_alike() {
    let mut narrow: HyperLogLog = HyperLogLog::new(10).unwrap();
    let mut wide: HyperLogLog = HyperLogLog::new(10).unwrap();
    for i in -100..100i32 {
        narrow.offer(&i);
        wide.offer(&i64::from(i));
    }
    assert_eq!(narrow, wide);
}

#[test]
fn test_strings_and_bytes_hash_alike() {
    let mut strings: HyperLogLog = HyperLogLog::new(10).unwrap();
    let mut bytes: HyperLogLog = HyperLogLog::new(10).unwrap();
    for i in 0..200 {
        let s = format!("key:{i}");
        strings.offer(s.as_str());
        bytes.offer(s.as_bytes());
    }
    assert_eq!(strings, bytes);
}

#[test]
fn test_offer_hashed_with_foreign_hash() {
    let mut hll = HyperLogLog::<WyHasher>::new(12).unwrap();
    let mut prehashed = HyperLogLog::<WyHasher>::new(12).unwrap();
    for i in 0..5000u64 {
        hll.offer(&i);
        prehashed.offer_hashed(WyHasher.hash_long(i as i64));
    }
    assert_eq!(hll, prehashed);

    let reference = HyperLogLog::<Murmur2>::unserialize(&hll.serialize()).unwrap();
    assert_eq!(reference.cardinality(), hll.cardinality());
}
