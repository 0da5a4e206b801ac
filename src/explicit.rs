//! ## Explicit representation
//! Counts small cardinalities exactly by storing every distinct hash.
//!
//! Hashes are kept in ascending order, so serialization is deterministic regardless of
//! insertion order. The set holds at most `threshold` hashes: the estimator promotes it to
//! `DenseRegisters` as soon as `should_promote` reports the threshold has been crossed.

use std::collections::BTreeSet;
use std::fmt::{Debug, Formatter};
use std::mem::size_of;

use crate::dense::DenseRegisters;
use crate::representation::RepresentationTrait;

/// Explicit representation container
#[derive(Clone, PartialEq)]
pub(crate) struct ExplicitSet {
    /// Maximum number of hashes stored before promotion
    threshold: usize,
    /// Distinct hashes in ascending order
    hashes: BTreeSet<u32>,
}

impl ExplicitSet {
    /// Create new empty instance of `ExplicitSet` representation
    pub(crate) fn new(threshold: usize) -> Self {
        Self {
            threshold,
            hashes: BTreeSet::new(),
        }
    }

    /// Insert hash, returns true if it wasn't stored yet
    #[inline]
    pub(crate) fn add(&mut self, hash: u32) -> bool {
        self.hashes.insert(hash)
    }

    /// Number of distinct hashes stored
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Return whether the set outgrew its threshold and must be promoted
    #[inline]
    pub(crate) fn should_promote(&self) -> bool {
        self.hashes.len() > self.threshold
    }

    /// Iterate over stored hashes in ascending order
    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.hashes.iter().copied()
    }

    /// Replay all stored hashes into `registers`, consuming the set
    pub(crate) fn drain_into(self, registers: &mut DenseRegisters) {
        for hash in self.hashes {
            registers.insert_hash(hash);
        }
    }
}

impl RepresentationTrait for ExplicitSet {
    #[inline]
    fn insert_hash(&mut self, hash: u32) -> bool {
        self.add(hash)
    }

    /// Return exact cardinality of `ExplicitSet` representation
    #[inline]
    fn estimate(&self) -> u64 {
        self.len() as u64
    }

    /// Return heap memory used by `ExplicitSet`, counting only the stored hashes of the tree
    #[inline]
    fn size_of(&self) -> usize {
        self.len() * size_of::<u32>()
    }
}

impl Debug for ExplicitSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string())
    }
}
