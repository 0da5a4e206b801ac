//! `hll-compat` is a HyperLogLog cardinality estimator which produces the same registers,
//! estimates and serialized bytes as stream-lib's `HyperLogLog`.
//!
//! Small sets are counted exactly and stored compactly, then promoted to 5-bit dense registers.
//! Estimators of equal precision can be merged, serialized and exchanged with other processes.
//!
//! ```
//! use hll_compat::HyperLogLog;
//!
//! let mut hll: HyperLogLog = HyperLogLog::new(16)?;
//! for i in 0..4i64 {
//!     hll.offer(&i);
//! }
//! hll.offer("four");
//! assert_eq!(hll.cardinality(), 5);
//!
//! let restored: HyperLogLog = HyperLogLog::unserialize(&hll.serialize())?;
//! assert_eq!(restored, hll);
//! # Ok::<(), hll_compat::EstimatorError>(())
//! ```
mod codec;
mod dense;
mod error;
pub mod estimator;
mod explicit;
pub mod hash;
mod indexing;
mod merge;
mod representation;
#[cfg(feature = "with_serde")]
mod serde;

pub use error::{EstimatorError, Result};
pub use estimator::{HyperLogLog, MAX_PRECISION, MIN_PRECISION};
pub use hash::{Murmur2, Observation, ObservationHasher, WyHasher};
pub use representation::Mode;
