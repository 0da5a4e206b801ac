//! HyperLogLog estimator allows to estimate number of distinct elements in the stream or dataset
//! using bounded memory. It is configured with a runtime precision `P` in [4..30] range, which
//! defines number of bits used for register indices (`M = 2^P` registers), and a hasher type.
//!
//! # Data-structure design rationale
//!
//! ## Exact small range
//! Estimator starts in explicit representation, storing distinct 32-bit hashes and reporting
//! their exact count. Once the number of hashes exceeds the promotion threshold, the estimator is
//! irreversibly promoted to dense representation. Threshold is picked so that explicit
//! representation never serializes to more bytes than dense one:
//! - P = 4     - 1 hash
//! - P = 10    - 85 hashes
//! - P = 12    - 341 hashes
//! - P = 16    - 5461 hashes
//!
//! ## Dense range
//! Classic HyperLogLog with `M` 5-bit registers and linear counting for small estimates.
//! Expected error:
//!   P = 10: 1.04 / sqrt(2^10) = 3.25%
//!   P = 12: 1.04 / sqrt(2^12) = 1.62%
//!   P = 16: 1.04 / sqrt(2^16) = 0.41%
//!
//! ## Interoperability
//! With the default `Murmur2` hasher, dense registers, estimates and serialized bytes are
//! identical to stream-lib's `HyperLogLog` fed with the same values.
//!
//! ## Concurrency
//! Estimator has no internal synchronization. To hand a snapshot to another thread or process,
//! `serialize` it and pass the owned buffer by value, then `unserialize` on the receiving side.

use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use crate::codec;
use crate::error::{EstimatorError, Result};
use crate::hash::{Murmur2, Observation, ObservationHasher};
use crate::merge::merge_representations;
use crate::representation::{Mode, Representation, RepresentationTrait};

/// Smallest supported precision
pub const MIN_PRECISION: u8 = 4;
/// Largest supported precision
pub const MAX_PRECISION: u8 = 30;

/// HyperLogLog cardinality estimator.
pub struct HyperLogLog<H: ObservationHasher = Murmur2> {
    /// Number of bits used for register indices
    precision: u8,
    /// Active storage
    representation: Representation,
    /// Zero-sized hasher
    hasher: H,
}

impl<H: ObservationHasher> HyperLogLog<H> {
    /// Creates new empty instance of `HyperLogLog` with `2^precision` registers.
    ///
    /// Fails with `InvalidPrecision` if `precision` is not in [4..30] range.
    pub fn new(precision: u8) -> Result<Self> {
        if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
            return Err(EstimatorError::InvalidPrecision(precision));
        }
        Ok(Self::from_parts(precision, Representation::new(precision)))
    }

    /// Create estimator from already validated parts
    #[inline]
    fn from_parts(precision: u8, representation: Representation) -> Self {
        Self {
            precision,
            representation,
            hasher: H::default(),
        }
    }

    /// Return precision of `HyperLogLog`
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Return storage mode of `HyperLogLog`
    #[inline]
    pub fn mode(&self) -> Mode {
        self.representation.mode()
    }

    /// Offer a value to `HyperLogLog`.
    /// Returns true if the estimator state changed.
    #[inline]
    pub fn offer<T: Observation + ?Sized>(&mut self, value: &T) -> bool {
        let hash = value.hash_with(&self.hasher);
        self.offer_hashed(hash)
    }

    /// Offer an already hashed value to `HyperLogLog`.
    ///
    /// The hash must come from the same algorithm as the estimator's hasher, otherwise the
    /// estimator can't be meaningfully merged or exchanged.
    #[inline]
    pub fn offer_hashed(&mut self, hash: u32) -> bool {
        let changed = self.representation.insert_hash(hash);
        self.representation.promote_if_needed(self.precision);
        changed
    }

    /// Return cardinality estimate, exact while in explicit mode
    #[inline]
    pub fn cardinality(&self) -> u64 {
        self.representation.estimate()
    }

    /// Merge `rhs` into `self`.
    ///
    /// Fails with `PrecisionMismatch`, leaving `self` untouched, if precisions differ.
    pub fn merge(&mut self, rhs: &Self) -> Result<()> {
        self.merge_all(&[rhs])
    }

    /// Merge all `others` into `self`.
    ///
    /// Precision of every operand is checked before any state is changed.
    pub fn merge_all(&mut self, others: &[&Self]) -> Result<()> {
        if let Some(other) = others.iter().find(|o| o.precision != self.precision) {
            return Err(EstimatorError::PrecisionMismatch {
                expected: self.precision,
                found: other.precision,
            });
        }
        for other in others {
            merge_representations(&mut self.representation, &other.representation, self.precision);
        }
        Ok(())
    }

    /// Serialize `HyperLogLog` in the layout of its current mode
    pub fn serialize(&self) -> Vec<u8> {
        codec::encode(self.precision, &self.representation)
    }

    /// Serialize `HyperLogLog` in the dense layout understood by stream-lib,
    /// regardless of current mode
    pub fn serialize_dense(&self) -> Vec<u8> {
        codec::encode_reference(self.precision, &self.representation)
    }

    /// Deserialize `HyperLogLog` from bytes produced by `serialize` or `serialize_dense`.
    ///
    /// Fails with `CorruptData` or `UnsupportedFormat` on malformed input.
    pub fn unserialize(bytes: &[u8]) -> Result<Self> {
        let (precision, representation) = codec::decode(bytes)?;
        Ok(Self::from_parts(precision, representation))
    }

    /// Return memory size of `HyperLogLog`
    pub fn size_of(&self) -> usize {
        size_of::<Self>() + self.representation.size_of()
    }
}

impl<H: ObservationHasher> Clone for HyperLogLog<H> {
    fn clone(&self) -> Self {
        Self::from_parts(self.precision, self.representation.clone())
    }
}

impl<H: ObservationHasher> PartialEq for HyperLogLog<H> {
    /// Compare precision and stored state
    fn eq(&self, rhs: &Self) -> bool {
        self.precision == rhs.precision && self.representation == rhs.representation
    }
}

impl<H: ObservationHasher> Debug for HyperLogLog<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{ representation: {:?}, estimate: {}, size: {} }}",
            self.mode(),
            self.cardinality(),
            self.size_of()
        )
    }
}
