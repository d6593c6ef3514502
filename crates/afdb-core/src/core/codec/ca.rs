//! Packed C-alpha coordinate blocks.
//!
//! A block holds `L` residues in one of two layouts, both axis-major
//! (every x, then every y, then every z):
//!
//! - **packed** (`6L + 6` bytes): per axis, an `i32` start value in
//!   thousandths of an Ångström followed by `L - 1` `i16` deltas between
//!   consecutive quantized values;
//! - **raw** (`12L` bytes): `3L` plain `f32` values, used when a step does not
//!   fit in an `i16` or packing would not save space.
//!
//! All integers and floats are little-endian. The layout is inferred from the
//! block length, which must be exactly one of the two sizes, optionally
//! followed by a single NUL terminator.

use thiserror::Error;

const SCALE: f32 = 1000.0;
const AXES: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Declared block length {declared} exceeds the {available} bytes available")]
    LengthExceedsBuffer { declared: usize, available: usize },

    #[error(
        "Block of {block_length} bytes is too short for {residue_count} residues (need at least {required})"
    )]
    BlockTooShort {
        residue_count: usize,
        block_length: usize,
        required: usize,
    },

    #[error(
        "Block of {block_length} bytes does not hold {residue_count} residues in either layout"
    )]
    LengthMismatch {
        residue_count: usize,
        block_length: usize,
    },

    #[error("Residue count {0} is too large to address")]
    ResidueCountOverflow(usize),
}

#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("Coordinate count {0} is not a multiple of 3")]
    NotTriples(usize),

    #[error("Coordinate {index} is not finite ({value})")]
    NonFinite { index: usize, value: f32 },

    #[error("Coordinate {index} ({value}) is outside the fixed-point range")]
    OutOfRange { index: usize, value: f32 },
}

fn packed_len(residue_count: usize) -> Option<usize> {
    residue_count.checked_mul(6)?.checked_add(6)
}

fn raw_len(residue_count: usize) -> Option<usize> {
    residue_count.checked_mul(AXES * size_of::<f32>())
}

/// Decodes `residue_count` C-alpha positions from the first `block_length`
/// bytes of `block`.
///
/// The result is axis-major and always holds exactly `3 * residue_count`
/// values. `block_length` must match the raw or packed size for
/// `residue_count`, or exceed it by a single trailing NUL.
///
/// # Errors
///
/// Returns [`DecodeError`] if `block_length` exceeds `block.len()`, is too
/// short for `residue_count` residues, or matches neither layout. No byte
/// outside `block[..block_length]` is ever read.
pub fn decode(
    block: &[u8],
    residue_count: usize,
    block_length: usize,
) -> Result<Vec<f32>, DecodeError> {
    if block_length > block.len() {
        return Err(DecodeError::LengthExceedsBuffer {
            declared: block_length,
            available: block.len(),
        });
    }
    let block = &block[..block_length];
    let payload = match block.split_last() {
        Some((0, rest)) => rest,
        _ => block,
    };

    if residue_count == 0 {
        return if payload.is_empty() {
            Ok(Vec::new())
        } else {
            Err(DecodeError::LengthMismatch {
                residue_count,
                block_length,
            })
        };
    }

    let raw = raw_len(residue_count).ok_or(DecodeError::ResidueCountOverflow(residue_count))?;
    let packed =
        packed_len(residue_count).ok_or(DecodeError::ResidueCountOverflow(residue_count))?;

    if payload.len() == raw || block.len() == raw {
        return Ok(decode_raw(&block[..raw]));
    }
    if payload.len() == packed || block.len() == packed {
        return Ok(decode_packed(&block[..packed], residue_count));
    }
    if block_length < packed {
        return Err(DecodeError::BlockTooShort {
            residue_count,
            block_length,
            required: packed,
        });
    }
    Err(DecodeError::LengthMismatch {
        residue_count,
        block_length,
    })
}

fn decode_raw(block: &[u8]) -> Vec<f32> {
    block
        .chunks_exact(size_of::<f32>())
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

fn decode_packed(block: &[u8], residue_count: usize) -> Vec<f32> {
    let axis_len = 4 + 2 * (residue_count - 1);
    let mut coords = Vec::with_capacity(AXES * residue_count);

    for axis in block.chunks_exact(axis_len) {
        let (head, deltas) = axis.split_at(4);
        let mut value = i32::from_le_bytes([head[0], head[1], head[2], head[3]]);
        coords.push(value as f32 / SCALE);
        for d in deltas.chunks_exact(2) {
            value = value.wrapping_add(i16::from_le_bytes([d[0], d[1]]) as i32);
            coords.push(value as f32 / SCALE);
        }
    }
    coords
}

/// Encodes axis-major coordinates into the smallest layout that represents
/// them to three decimal places.
pub fn encode(coords: &[f32]) -> Result<Vec<u8>, EncodeError> {
    if coords.len() % AXES != 0 {
        return Err(EncodeError::NotTriples(coords.len()));
    }
    if let Some((index, &value)) = coords.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(EncodeError::NonFinite { index, value });
    }

    let residue_count = coords.len() / AXES;
    if residue_count <= 1 {
        return Ok(encode_raw(coords));
    }

    let mut quantized = Vec::with_capacity(coords.len());
    for (index, &value) in coords.iter().enumerate() {
        let scaled = (value as f64 * SCALE as f64).round();
        if scaled < i32::MIN as f64 || scaled > i32::MAX as f64 {
            return Err(EncodeError::OutOfRange { index, value });
        }
        quantized.push(scaled as i32);
    }

    let fits_i16 = quantized.chunks_exact(residue_count).all(|axis| {
        axis.windows(2)
            .all(|w| i16::try_from(w[1] as i64 - w[0] as i64).is_ok())
    });
    if !fits_i16 {
        return Ok(encode_raw(coords));
    }

    let mut block = Vec::with_capacity(6 * residue_count + 6);
    for axis in quantized.chunks_exact(residue_count) {
        block.extend_from_slice(&axis[0].to_le_bytes());
        for w in axis.windows(2) {
            let delta = (w[1] - w[0]) as i16;
            block.extend_from_slice(&delta.to_le_bytes());
        }
    }
    Ok(block)
}

fn encode_raw(coords: &[f32]) -> Vec<u8> {
    coords.iter().flat_map(|v| v.to_le_bytes()).collect()
}
