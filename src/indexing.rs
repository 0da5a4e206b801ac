//! ## Register indexing
//! Splits a 32-bit hash into a register index and a rank:
//! - index - top `P` bits of the hash, in `[0..2^P)` range.
//! - rank  - 1 + number of leading zeros in the remaining `32 - P` bits.
//!
//! The remaining bits are bounded by a sentinel bit at position `P - 1`, so rank is capped at
//! `33 - P`, which always fits into a 5-bit register. Rank is 1-based so that a register value of
//! 0 means "never observed".

/// Register width in bits
pub(crate) const REGISTER_WIDTH: usize = 5;
/// Largest value representable by a register
pub(crate) const MAX_RANK: u32 = (1 << REGISTER_WIDTH) - 1;

/// Return register index and rank of the given hash for precision `p`
#[inline]
pub(crate) fn index_and_rank(hash: u32, p: u8) -> (usize, u32) {
    let p = u32::from(p);
    let idx = (hash >> (32 - p)) as usize;
    let remaining = (hash << p) | ((1 << (p - 1)) + 1);
    let rank = (remaining.leading_zeros() + 1).min(MAX_RANK);
    (idx, rank)
}
