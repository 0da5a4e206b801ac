use hll_compat::HyperLogLog;

fn main() -> hll_compat::Result<()> {
    let mut estimator1: HyperLogLog = HyperLogLog::new(12)?;
    for i in 0..10i64 {
        estimator1.offer(&i);
    }
    println!("estimator1 = {:?}", estimator1);

    let mut estimator2: HyperLogLog = HyperLogLog::new(12)?;
    for i in 10..15i64 {
        estimator2.offer(&i);
    }
    println!("estimator2 = {:?}", estimator2);

    estimator1.merge(&estimator2)?;
    println!("merged estimate = {}", estimator1.cardinality());

    for i in 0..100_000i64 {
        estimator1.offer(&i);
    }
    println!("after 100k offers = {:?}", estimator1);
    println!("dense snapshot = {} bytes", estimator1.serialize_dense().len());
    Ok(())
}
