//! ## Binary format
//! Big-endian layout shared with stream-lib's `HyperLogLog.getBytes()`:
//!
//! - 0..4 bytes    - `log2m`, signed 32-bit integer
//! - 4..8 bytes    - payload length in bytes, signed 32-bit integer
//! - 8.. bytes     - payload
//!
//! Dense payload is the reference one, `ceil(2^P / 6)` packed register words written as
//! big-endian `u32`, so its length is always a multiple of 4 and it carries no format tag.
//!
//! Explicit payload is a format tag byte (`2`) followed by the stored hashes in ascending order,
//! each widened to a big-endian `u64`. Its length `1 + 8 * N` is always odd, which tells the two
//! layouts apart when decoding.
//!
//! Decoding validates everything and never returns a partially constructed estimator.

use crate::dense::DenseRegisters;
use crate::error::{EstimatorError, Result};
use crate::estimator::{MAX_PRECISION, MIN_PRECISION};
use crate::explicit::ExplicitSet;
use crate::representation::{Representation, EXPLICIT_VALUE_BYTES};

/// Format tag of explicit payload
pub(crate) const FORMAT_EXPLICIT: u8 = 2;
/// Length of `log2m` and payload length fields
const HEADER_LEN: usize = 8;
/// Length of a single register word
const WORD_BYTES: usize = 4;

/// Serialize representation in its own layout
pub(crate) fn encode(precision: u8, representation: &Representation) -> Vec<u8> {
    match representation {
        Representation::Explicit(set) => encode_explicit(precision, set),
        Representation::Dense(registers) => encode_dense(precision, registers),
    }
}

/// Serialize representation in the dense layout, promoting a copy of explicit representation
pub(crate) fn encode_reference(precision: u8, representation: &Representation) -> Vec<u8> {
    match representation {
        Representation::Dense(registers) => encode_dense(precision, registers),
        Representation::Explicit(_) => {
            let mut promoted = representation.clone();
            promoted.promote(precision);
            encode_reference(precision, &promoted)
        }
    }
}

fn encode_explicit(precision: u8, set: &ExplicitSet) -> Vec<u8> {
    let payload_len = 1 + set.len() * EXPLICIT_VALUE_BYTES;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload_len);
    write_header(&mut buf, precision, payload_len);
    buf.push(FORMAT_EXPLICIT);
    for h in set.iter() {
        buf.extend_from_slice(&u64::from(h).to_be_bytes());
    }
    buf
}

fn encode_dense(precision: u8, registers: &DenseRegisters) -> Vec<u8> {
    let payload_len = registers.words().len() * WORD_BYTES;
    let mut buf = Vec::with_capacity(HEADER_LEN + payload_len);
    write_header(&mut buf, precision, payload_len);
    for word in registers.words() {
        buf.extend_from_slice(&word.to_be_bytes());
    }
    buf
}

fn write_header(buf: &mut Vec<u8>, precision: u8, payload_len: usize) {
    buf.extend_from_slice(&i32::from(precision).to_be_bytes());
    // payload never exceeds `4 * ceil(2^30 / 6)` bytes
    buf.extend_from_slice(&(payload_len as i32).to_be_bytes());
}

/// Deserialize precision and representation
pub(crate) fn decode(bytes: &[u8]) -> Result<(u8, Representation)> {
    if bytes.len() < HEADER_LEN {
        return Err(corrupt(format!(
            "expected at least {HEADER_LEN} bytes, found {}",
            bytes.len()
        )));
    }

    let log2m = read_i32(&bytes[0..4]);
    let precision = u8::try_from(log2m)
        .ok()
        .filter(|p| (MIN_PRECISION..=MAX_PRECISION).contains(p))
        .ok_or_else(|| corrupt(format!("precision {log2m} is out of bounds")))?;

    let declared_len = read_i32(&bytes[4..8]);
    let payload_len = usize::try_from(declared_len)
        .map_err(|_| corrupt(format!("negative payload length {declared_len}")))?;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != payload_len {
        return Err(corrupt(format!(
            "payload length {payload_len} doesn't match {} available bytes",
            payload.len()
        )));
    }

    let representation = if payload_len == DenseRegisters::word_count(precision) * WORD_BYTES {
        decode_dense(precision, payload)?
    } else if payload_len % 2 == 0 {
        return Err(corrupt(format!(
            "payload length {payload_len} matches neither dense nor explicit layout"
        )));
    } else {
        match payload[0] {
            FORMAT_EXPLICIT => decode_explicit(precision, &payload[1..])?,
            tag => return Err(EstimatorError::UnsupportedFormat(tag)),
        }
    };

    Ok((precision, representation))
}

fn decode_dense(precision: u8, payload: &[u8]) -> Result<Representation> {
    let words = payload.chunks_exact(WORD_BYTES).map(read_u32).collect();
    Ok(Representation::Dense(DenseRegisters::from_words(precision, words)?))
}

fn decode_explicit(precision: u8, values: &[u8]) -> Result<Representation> {
    if values.len() % EXPLICIT_VALUE_BYTES != 0 {
        return Err(corrupt(format!(
            "explicit values length {} is not a multiple of {EXPLICIT_VALUE_BYTES}",
            values.len()
        )));
    }

    let mut set = ExplicitSet::new(Representation::promotion_threshold(precision));
    let mut previous = None;
    for chunk in values.chunks_exact(EXPLICIT_VALUE_BYTES) {
        let value = read_u64(chunk);
        if previous.is_some_and(|p| value <= p) {
            return Err(corrupt("explicit values must be strictly ascending".to_string()));
        }
        let h = u32::try_from(value)
            .map_err(|_| corrupt(format!("explicit value {value:#x} exceeds hash range")))?;
        set.add(h);
        previous = Some(value);
    }

    let mut representation = Representation::Explicit(set);
    representation.promote_if_needed(precision);
    Ok(representation)
}

#[inline]
fn corrupt(reason: String) -> EstimatorError {
    EstimatorError::CorruptData(reason)
}

// Callers pass slices of exactly the right length.
#[inline]
fn read_i32(b: &[u8]) -> i32 {
    i32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

#[inline]
fn read_u32(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

#[inline]
fn read_u64(b: &[u8]) -> u64 {
    u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}
