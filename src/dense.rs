//! ## Dense representation
//! Allows to estimate large cardinality using `M = 2^P` registers of 5 bits each.
//!
//! Registers are packed into `u32` words exactly as stream-lib's `RegisterSet` does:
//! - six registers per word, register `i` stored in word `i / 6` at bit offset `5 * (i % 6)`
//! - the two most significant bits of every word are unused and always zero
//! - `ceil(M / 6)` words in total, the last one padded with zero registers
//!
//! Words are kept in memory in this layout so serialization is a plain big-endian dump.

use std::fmt::{Debug, Formatter};
use std::mem::size_of_val;

use crate::error::{EstimatorError, Result};
use crate::indexing::{index_and_rank, MAX_RANK, REGISTER_WIDTH};
use crate::representation::RepresentationTrait;

/// Number of registers stored in a single `u32` word
const REGISTERS_PER_WORD: usize = 6;
/// Mask covering the bits of all registers of a word
const WORD_MASK: u32 = (1 << (REGISTER_WIDTH * REGISTERS_PER_WORD)) - 1;

/// Dense representation container
#[derive(Clone, PartialEq)]
pub(crate) struct DenseRegisters {
    /// Number of bits used for register indices
    precision: u8,
    /// Packed registers
    words: Vec<u32>,
}

impl DenseRegisters {
    /// Create new instance of `DenseRegisters` with all registers set to 0
    pub(crate) fn new(precision: u8) -> Self {
        Self {
            precision,
            words: vec![0; Self::word_count(precision)],
        }
    }

    /// Create new instance of `DenseRegisters` from packed words.
    ///
    /// Words must carry no bits outside of register slots and no non-zero padding registers.
    pub(crate) fn from_words(precision: u8, words: Vec<u32>) -> Result<Self> {
        if words.len() != Self::word_count(precision) {
            return Err(EstimatorError::CorruptData(format!(
                "expected {} register words, found {}",
                Self::word_count(precision),
                words.len()
            )));
        }
        if words.iter().any(|&w| w & !WORD_MASK != 0) {
            return Err(EstimatorError::CorruptData(
                "register word has bits set outside of register slots".to_string(),
            ));
        }

        let registers = Self { precision, words };
        let count = registers.count();
        let padded = registers.words.len() * REGISTERS_PER_WORD;
        if (count..padded).any(|idx| registers.get(idx) != 0) {
            return Err(EstimatorError::CorruptData(
                "padding registers must be zero".to_string(),
            ));
        }

        Ok(registers)
    }

    /// Number of `u32` words needed to store `2^precision` registers
    #[inline]
    pub(crate) fn word_count(precision: u8) -> usize {
        (1usize << precision).div_ceil(REGISTERS_PER_WORD)
    }

    /// Number of registers
    #[inline]
    pub(crate) fn count(&self) -> usize {
        1 << self.precision
    }

    /// Packed register words
    #[inline]
    pub(crate) fn words(&self) -> &[u32] {
        &self.words
    }

    /// Get register `idx`
    #[inline]
    pub(crate) fn get(&self, idx: usize) -> u32 {
        let (word, shift) = Self::locate(idx);
        (self.words[word] >> shift) & MAX_RANK
    }

    /// Set register `idx` to `max(current, rank)`.
    /// Returns true if register was increased.
    #[inline]
    pub(crate) fn update(&mut self, idx: usize, rank: u32) -> bool {
        let (word, shift) = Self::locate(idx);
        let mask = MAX_RANK << shift;
        let current = self.words[word] & mask;
        let new = (rank & MAX_RANK) << shift;
        if new > current {
            self.words[word] = (self.words[word] & !mask) | new;
            return true;
        }
        false
    }

    /// Iterate over `(index, rank)` pairs of all registers
    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.words
            .iter()
            .flat_map(|&word| {
                (0..REGISTERS_PER_WORD)
                    .map(move |slot| (word >> (REGISTER_WIDTH * slot)) & MAX_RANK)
            })
            .take(self.count())
            .enumerate()
    }

    /// Merge `rhs` registers into `self` taking maximum of each register pair
    #[inline]
    pub(crate) fn merge(&mut self, rhs: &DenseRegisters) {
        debug_assert_eq!(self.precision, rhs.precision);
        for (lhs_word, &rhs_word) in self.words.iter_mut().zip(rhs.words.iter()) {
            let mut word = 0;
            for slot in 0..REGISTERS_PER_WORD {
                let mask = MAX_RANK << (REGISTER_WIDTH * slot);
                word |= (*lhs_word & mask).max(rhs_word & mask);
            }
            *lhs_word = word;
        }
    }

    /// Return number of zero registers and harmonic sum of all registers
    #[inline]
    fn zeros_and_sum(&self) -> (usize, f64) {
        self.iter()
            .fold((0, 0.0), |(zeros, sum), (_, rank)| {
                (zeros + usize::from(rank == 0), sum + 1.0 / f64::from(1u32 << rank))
            })
    }

    /// Return word index and bit shift of register `idx`
    #[inline]
    fn locate(idx: usize) -> (usize, usize) {
        let word = idx / REGISTERS_PER_WORD;
        let shift = REGISTER_WIDTH * (idx % REGISTERS_PER_WORD);
        (word, shift)
    }
}

impl RepresentationTrait for DenseRegisters {
    /// Insert hash into `DenseRegisters` representation
    #[inline]
    fn insert_hash(&mut self, hash: u32) -> bool {
        let (idx, rank) = index_and_rank(hash, self.precision);
        self.update(idx, rank)
    }

    /// Return cardinality estimate of `DenseRegisters` representation.
    ///
    /// Raw HyperLogLog estimate with linear counting for the small range. No large range
    /// correction is applied: stream-lib doesn't apply one either, and estimates must agree
    /// with it for identical registers.
    #[inline]
    fn estimate(&self) -> u64 {
        let m = self.count();
        let (zeros, sum) = self.zeros_and_sum();
        let mut estimate = alpha_mm(m) / sum;
        if estimate <= 2.5 * m as f64 && zeros > 0 {
            estimate = linear_counting(m, zeros);
        }
        (estimate + 0.5) as u64
    }

    /// Return heap memory used by `DenseRegisters`
    #[inline]
    fn size_of(&self) -> usize {
        size_of_val(self.words.as_slice())
    }
}

impl Debug for DenseRegisters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string())
    }
}

/// Bias correction constant multiplied by `m^2`
#[inline]
fn alpha_mm(m: usize) -> f64 {
    let alpha = match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / (m as f64)),
    };
    alpha * m as f64 * m as f64
}

/// Linear counting estimate based on number of zero registers
#[inline]
fn linear_counting(m: usize, zeros: usize) -> f64 {
    m as f64 * (m as f64 / zeros as f64).ln()
}
