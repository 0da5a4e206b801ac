use std::mem::{replace, size_of};

use enum_dispatch::enum_dispatch;

use crate::dense::DenseRegisters;
use crate::explicit::ExplicitSet;

/// Width of a single explicit hash in the serialized format
pub(crate) const EXPLICIT_VALUE_BYTES: usize = size_of::<u64>();

/// Representation types supported by `HyperLogLog`
#[enum_dispatch]
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Representation {
    Explicit(ExplicitSet),
    Dense(DenseRegisters),
}

/// Representation trait which must be implemented by all representations.
#[enum_dispatch(Representation)]
pub(crate) trait RepresentationTrait {
    /// Insert hash, returns true if the representation changed
    fn insert_hash(&mut self, hash: u32) -> bool;
    fn estimate(&self) -> u64;
    /// Heap memory used by the representation
    fn size_of(&self) -> usize;
    fn to_string(&self) -> String {
        format!("estimate: {}, size: {}", self.estimate(), self.size_of())
    }
}

/// Storage mode of a `HyperLogLog`, exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Distinct hashes are stored as is and counted exactly.
    Explicit,
    /// Hashes are folded into bit-packed registers and counted approximately.
    Dense,
}

impl Representation {
    /// Create new empty representation for given precision
    pub(crate) fn new(precision: u8) -> Self {
        Representation::Explicit(ExplicitSet::new(Self::promotion_threshold(precision)))
    }

    /// Maximum number of hashes held by the explicit representation.
    ///
    /// Largest `k` such that the explicit encoding (`1 + 8 * k` bytes) still fits within the
    /// dense encoding (`4 * ceil(2^P / 6)` bytes).
    #[inline]
    pub(crate) fn promotion_threshold(precision: u8) -> usize {
        (4 * DenseRegisters::word_count(precision) - 1) / EXPLICIT_VALUE_BYTES
    }

    /// Return storage mode of the representation
    #[inline]
    pub(crate) fn mode(&self) -> Mode {
        match self {
            Representation::Explicit(_) => Mode::Explicit,
            Representation::Dense(_) => Mode::Dense,
        }
    }

    /// Promote explicit representation into dense one if it outgrew its threshold
    #[inline]
    pub(crate) fn promote_if_needed(&mut self, precision: u8) {
        if matches!(self, Representation::Explicit(set) if set.should_promote()) {
            self.promote(precision);
        }
    }

    /// Convert explicit representation into dense one, replaying all of its hashes.
    /// Dense representation is left as is.
    pub(crate) fn promote(&mut self, precision: u8) {
        if let Representation::Explicit(set) = self {
            let set = replace(set, ExplicitSet::new(0));
            let mut registers = DenseRegisters::new(precision);
            set.drain_into(&mut registers);
            *self = Representation::Dense(registers);
        }
    }
}
