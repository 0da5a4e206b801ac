#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use hll_compat::{HyperLogLog, Mode};
use hyperloglogplus::{HyperLogLog as _, HyperLogLogPlus};
use std::hash::BuildHasherDefault;
use tabled::{
    settings::{Settings, Style},
    Table, Tabled,
};
use wyhash::WyHash;

const PRECISION: u8 = 12;
/// Serialized size of a dense P = 12 estimator: header and `ceil(4096 / 6)` words
const DENSE_SNAPSHOT_LEN: usize = 8 + 683 * 4;

#[derive(Tabled)]
struct Record {
    cardinality: usize,
    mode: String,
    hll_compat: String,
    snapshot_bytes: usize,
    dense_snapshot_bytes: usize,
    hyperloglog: String,
    hyperloglogplus: String,
}

/// Heap statistics collected while filling an estimator
struct Usage {
    size: usize,
    total_bytes: u64,
    total_blocks: u64,
}

impl Usage {
    fn measure<T>(cardinality: usize, create: impl Fn() -> T, insert: impl Fn(&mut T, &usize)) -> Self {
        let _profiler = dhat::Profiler::builder().testing().build();
        let mut estimator = create();
        for i in 0..cardinality {
            insert(&mut estimator, &i);
        }
        let stats = dhat::HeapStats::get();
        Self {
            size: std::mem::size_of::<T>(),
            total_bytes: stats.total_bytes,
            total_blocks: stats.total_blocks,
        }
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.size, self.total_bytes, self.total_blocks)
    }
}

fn filled(cardinality: usize) -> HyperLogLog {
    let mut estimator: HyperLogLog = HyperLogLog::new(PRECISION).unwrap();
    for i in 0..cardinality {
        estimator.offer(&i);
    }
    estimator
}

#[test]
fn test_allocations() {
    let cardinalities: Vec<usize> = std::iter::once(0)
        .chain((0..).map(|c| 1 << c))
        .take_while(|&c| c <= 1 << 20)
        .collect();

    let mut records = Vec::with_capacity(cardinalities.len());
    let mut dense_usage: Option<u64> = None;
    for &cardinality in &cardinalities {
        let usage = Usage::measure(
            cardinality,
            || HyperLogLog::<hll_compat::Murmur2>::new(PRECISION).unwrap(),
            |est, i| {
                est.offer(i);
            },
        );

        let estimator = filled(cardinality);
        let snapshot = estimator.serialize();
        let dense_snapshot = estimator.serialize_dense();

        // explicit snapshots are never larger than dense ones
        assert!(
            snapshot.len() <= dense_snapshot.len(),
            "{cardinality}: {} > {}",
            snapshot.len(),
            dense_snapshot.len()
        );
        assert_eq!(dense_snapshot.len(), DENSE_SNAPSHOT_LEN);
        if estimator.mode() == Mode::Dense {
            assert_eq!(snapshot, dense_snapshot);
        } else {
            assert_eq!(snapshot.len(), 8 + 1 + 8 * cardinality);
        }

        // once promoted, registers are allocated once and never grow
        if cardinality > 1 << 12 {
            match dense_usage {
                Some(bytes) => assert_eq!(usage.total_bytes, bytes, "{cardinality}"),
                None => dense_usage = Some(usage.total_bytes),
            }
        }

        records.push(Record {
            cardinality,
            mode: format!("{:?}", estimator.mode()),
            hll_compat: usage.to_string(),
            snapshot_bytes: snapshot.len(),
            dense_snapshot_bytes: dense_snapshot.len(),
            hyperloglog: Usage::measure(
                cardinality,
                || hyperloglog::HyperLogLog::new(0.01625),
                |est, i| est.insert(i),
            )
            .to_string(),
            hyperloglogplus: Usage::measure(
                cardinality,
                || {
                    HyperLogLogPlus::<usize, _>::new(
                        PRECISION,
                        BuildHasherDefault::<WyHash>::default(),
                    )
                    .unwrap()
                },
                |est, i| est.insert(i),
            )
            .to_string(),
        });
    }

    let table_config = Settings::default().with(Style::markdown());
    let markdown = Table::new(records).with(table_config).to_string();
    std::fs::write(
        format!("{}/target/memory_allocations.md", env!("CARGO_MANIFEST_DIR")),
        &markdown,
    )
    .unwrap();
    println!("{}", markdown);
}
