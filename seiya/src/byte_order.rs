//! Byte-order normalization for f64 arrays.
//!
//! Containers such as FITS store data big-endian. Everything downstream of this
//! module assumes native order; running the reconstruction on swapped values
//! silently produces garbage.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the target platform.
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    #[inline]
    pub fn is_native(self) -> bool {
        self == Self::native()
    }
}

/// Decode raw bytes of the given order into native f64 values.
pub fn decode_f64(bytes: &[u8], order: ByteOrder) -> Result<Vec<f64>> {
    if bytes.len() % 8 != 0 {
        return Err(Error::InvalidByteLength { len: bytes.len() });
    }
    let decode: fn([u8; 8]) -> f64 = match order {
        ByteOrder::Little => f64::from_le_bytes,
        ByteOrder::Big => f64::from_be_bytes,
    };
    Ok(bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            decode(word)
        })
        .collect())
}

/// Encode native f64 values as bytes of the given order.
pub fn encode_f64(values: &[f64], order: ByteOrder) -> Vec<u8> {
    let encode: fn(f64) -> [u8; 8] = match order {
        ByteOrder::Little => f64::to_le_bytes,
        ByteOrder::Big => f64::to_be_bytes,
    };
    values.iter().flat_map(|&v| encode(v)).collect()
}

/// Swap values in place when they were loaded as `declared` order on a host of
/// a different order. Returns whether a swap happened.
pub fn normalize_in_place(values: &mut [f64], declared: ByteOrder) -> bool {
    if declared.is_native() {
        return false;
    }
    tracing::warn!(
        values = values.len(),
        declared = ?declared,
        native = ?ByteOrder::native(),
        "Changing endianness for input data"
    );
    for v in values.iter_mut() {
        *v = f64::from_bits(v.to_bits().swap_bytes());
    }
    true
}
