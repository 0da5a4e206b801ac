#![no_main]

use hll_compat::HyperLogLog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut estimator) = HyperLogLog::<hll_compat::Murmur2>::unserialize(data) {
        let bytes = estimator.serialize();
        assert_eq!(HyperLogLog::<hll_compat::Murmur2>::unserialize(&bytes).as_ref(), Ok(&estimator));
        estimator.offer(&1i64);
        assert!(estimator.cardinality() > 0);
    }
});
