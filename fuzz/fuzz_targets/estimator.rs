#![no_main]

use hll_compat::HyperLogLog;
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let precision = 4 + data[0] % 13;
    let split_index = wyhash(data, 0) as usize % data.len();
    let (first_half, second_half) = data.split_at(split_index);

    let mut estimator1: HyperLogLog = HyperLogLog::new(precision).unwrap();
    for chunk in first_half.chunks(4) {
        estimator1.offer(chunk);
        assert!(estimator1.cardinality() > 0);
        assert!(estimator1.size_of() > 0);
    }

    let mut estimator2: HyperLogLog = HyperLogLog::new(precision).unwrap();
    for chunk in second_half.chunks(4) {
        estimator2.offer(chunk);
        assert!(estimator2.cardinality() > 0);
        assert!(estimator2.size_of() > 0);
    }

    estimator1.merge(&estimator2).unwrap();
    assert_eq!(estimator1.precision(), precision);

    let restored: HyperLogLog = HyperLogLog::unserialize(&estimator1.serialize()).unwrap();
    assert_eq!(restored, estimator1);
});
