//! Error types for cube reconstruction and its collaborators.

use thiserror::Error;

use crate::byte_order::ByteOrder;

/// Errors raised before any reconstruction work starts.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Shape mismatch for {array} array: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        array: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Unsupported output shape ({rows}, {cols}): both extents must be positive")]
    UnsupportedShape { rows: isize, cols: isize },

    #[error("Invalid cube configuration: {0}")]
    InvalidConfig(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Byte buffer of length {len} is not a whole number of f64 values")]
    InvalidByteLength { len: usize },

    #[error("Planes are {order:?}-endian; normalize to native order before reconstruction")]
    ForeignByteOrder { order: ByteOrder },

    #[error("Failed to parse cube configuration")]
    ConfigParse(#[from] serde_yml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
