//! ## Hashing
//! Observations are reduced to a 32-bit hash before they touch any representation.
//!
//! The default `Murmur2` hasher reproduces the MurmurHash2 variant used by stream-lib's
//! `HyperLogLog`, which is required for merge partners and serialized snapshots to agree
//! with estimators built by other implementations:
//! - integers (and floats through their raw bit patterns) go through the 64-bit key routine,
//! - byte strings and UTF-8 strings go through the byte routine seeded with `-1`,
//!   including its sign-extending treatment of trailing bytes.
//!
//! `WyHasher` is a faster alternative for callers who never exchange state with
//! other implementations. The hasher is a type parameter of `HyperLogLog`, so estimators built
//! with different hashers can't be merged by accident.

use wyhash::wyhash;

/// MurmurHash2 multiplication constant
const MURMUR_M: u32 = 0x5bd1_e995;
/// MurmurHash2 shift constant
const MURMUR_R: u32 = 24;
/// Seed used by the reference byte-array routine (`-1` as two's complement)
const MURMUR_BYTES_SEED: u32 = 0xffff_ffff;

/// Maps observations to 32-bit hashes.
///
/// Implementations must be deterministic across processes: serialized estimators are only
/// meaningful to readers that hash with the same algorithm.
pub trait ObservationHasher: Default {
    /// Hash a 64-bit integer key.
    fn hash_long(&self, value: i64) -> u32;
    /// Hash an arbitrary byte string.
    fn hash_bytes(&self, bytes: &[u8]) -> u32;
}

/// Reference MurmurHash2 hasher, compatible with stream-lib.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Murmur2;

impl ObservationHasher for Murmur2 {
    #[inline]
    fn hash_long(&self, value: i64) -> u32 {
        let data = value as u64;

        let mut k = (data as u32).wrapping_mul(MURMUR_M);
        k ^= k >> MURMUR_R;
        let mut h = k.wrapping_mul(MURMUR_M);

        let mut k = ((data >> 32) as u32).wrapping_mul(MURMUR_M);
        k ^= k >> MURMUR_R;
        h = h.wrapping_mul(MURMUR_M);
        h ^= k.wrapping_mul(MURMUR_M);

        finalize(h)
    }

    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u32 {
        let mut h = MURMUR_BYTES_SEED ^ (bytes.len() as u32);

        let mut chunks = bytes.chunks_exact(4);
        for chunk in &mut chunks {
            let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            k = k.wrapping_mul(MURMUR_M);
            k ^= k >> MURMUR_R;
            k = k.wrapping_mul(MURMUR_M);
            h = h.wrapping_mul(MURMUR_M);
            h ^= k;
        }

        // Trailing bytes are sign-extended before mixing, unlike canonical MurmurHash2.
        let tail = chunks.remainder();
        if !tail.is_empty() {
            for (i, &b) in tail.iter().enumerate() {
                let shift = 8 * (tail.len() - 1 - i);
                h ^= (i32::from(b as i8) << shift) as u32;
            }
            h = h.wrapping_mul(MURMUR_M);
        }

        finalize(h)
    }
}

/// Final avalanche step shared by both MurmurHash2 routines
#[inline]
fn finalize(mut h: u32) -> u32 {
    h ^= h >> 13;
    h = h.wrapping_mul(MURMUR_M);
    h ^= h >> 15;
    h
}

/// Non-reference hasher backed by `wyhash`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WyHasher;

impl ObservationHasher for WyHasher {
    #[inline]
    fn hash_long(&self, value: i64) -> u32 {
        self.hash_bytes(&value.to_le_bytes())
    }

    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u32 {
        let h = wyhash(bytes, 0);
        ((h >> 32) as u32) ^ (h as u32)
    }
}

/// A value that can be offered to a `HyperLogLog`.
///
/// Compound values are out of scope: callers reduce them to an integer or a byte string first.
pub trait Observation {
    /// Hash the observation with the given hasher.
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32;
}

macro_rules! impl_observation_widening {
    ($($t:ty),*) => {
        $(
            impl Observation for $t {
                #[inline]
                fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
                    hasher.hash_long(i64::from(*self))
                }
            }
        )*
    };
}

// Same-width and pointer-sized integers keep their bit pattern as a 64-bit key.
macro_rules! impl_observation_reinterpret {
    ($($t:ty),*) => {
        $(
            impl Observation for $t {
                #[inline]
                fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
                    hasher.hash_long(*self as i64)
                }
            }
        )*
    };
}

impl_observation_widening!(i8, i16, i32, i64, u8, u16, u32);
impl_observation_reinterpret!(u64, isize, usize);

impl Observation for f64 {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        hasher.hash_long(self.to_bits() as i64)
    }
}

impl Observation for f32 {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        hasher.hash_long(i64::from(self.to_bits() as i32))
    }
}

impl Observation for char {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        let mut buf = [0u8; 4];
        hasher.hash_bytes(self.encode_utf8(&mut buf).as_bytes())
    }
}

impl Observation for str {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        hasher.hash_bytes(self.as_bytes())
    }
}

impl Observation for String {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        hasher.hash_bytes(self.as_bytes())
    }
}

impl Observation for [u8] {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        hasher.hash_bytes(self)
    }
}

impl<const N: usize> Observation for [u8; N] {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        hasher.hash_bytes(self)
    }
}

impl Observation for Vec<u8> {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        hasher.hash_bytes(self)
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    #[inline]
    fn hash_with<H: ObservationHasher>(&self, hasher: &H) -> u32 {
        (**self).hash_with(hasher)
    }
}
