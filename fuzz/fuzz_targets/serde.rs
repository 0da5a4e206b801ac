#![no_main]

use hll_compat::HyperLogLog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut estimator) = serde_json::from_slice::<HyperLogLog>(data) {
        estimator.offer(&1usize);
        assert!(estimator.cardinality() > 0);
    }
});
