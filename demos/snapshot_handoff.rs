//! Counts distinct users on several worker threads and merges their snapshots on the main thread.
//!
//! Estimators are not shared between threads: every worker owns one, serializes it when done and
//! moves the bytes through a channel.
use std::sync::mpsc;
use std::thread;

use hll_compat::HyperLogLog;

const WORKERS: u64 = 4;
const EVENTS_PER_WORKER: u64 = 250_000;
const PRECISION: u8 = 14;

fn main() -> hll_compat::Result<()> {
    let (tx, rx) = mpsc::channel::<Vec<u8>>();

    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let tx = tx.clone();
            thread::spawn(move || -> hll_compat::Result<()> {
                let mut local: HyperLogLog = HyperLogLog::new(PRECISION)?;
                // neighbouring workers see half of each other's users
                let first = worker * EVENTS_PER_WORKER / 2;
                for user in first..first + EVENTS_PER_WORKER {
                    local.offer(&format!("user-{user}"));
                }
                tx.send(local.serialize()).expect("receiver dropped");
                Ok(())
            })
        })
        .collect();
    drop(tx);

    let mut total: HyperLogLog = HyperLogLog::new(PRECISION)?;
    for snapshot in rx {
        let partial: HyperLogLog = HyperLogLog::unserialize(&snapshot)?;
        println!("received snapshot of {} bytes, estimate {}", snapshot.len(), partial.cardinality());
        total.merge(&partial)?;
    }
    for handle in handles {
        handle.join().expect("worker thread panicked")?;
    }

    let expected = (WORKERS + 1) * EVENTS_PER_WORKER / 2;
    println!("distinct users: estimate {}, exact {}", total.cardinality(), expected);
    Ok(())
}
