//! Errors reported by `HyperLogLog` construction, merging and decoding.
//!
//! Every error is a caller input problem: the estimator performs no I/O and never retries.
//! Failing operations leave the receiver untouched and never hand back a partially built estimator.

use thiserror::Error;

use crate::estimator::{MAX_PRECISION, MIN_PRECISION};

/// Estimator error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimatorError {
    /// Requested precision is outside of the supported `[MIN_PRECISION..=MAX_PRECISION]` range.
    #[error("precision {0} is out of bounds, expected a value in [{MIN_PRECISION}..={MAX_PRECISION}]")]
    InvalidPrecision(u8),
    /// Merge operands were built with different precisions.
    #[error("precisions must be equal: expected {expected}, found {found}")]
    PrecisionMismatch { expected: u8, found: u8 },
    /// Serialized buffer is truncated, inconsistent or otherwise malformed.
    #[error("corrupt data: {0}")]
    CorruptData(String),
    /// Serialized buffer carries a format tag this crate does not decode.
    #[error("unsupported format tag {0}")]
    UnsupportedFormat(u8),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, EstimatorError>;
