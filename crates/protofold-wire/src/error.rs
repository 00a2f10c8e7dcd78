//! Error type for the metadata walk

use thiserror::Error;

/// Reasons a metadata walk stops early.
///
/// These never escape the lookup functions; they are kept on [`crate::Fields`]
/// so callers can log why a walk ended.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("input ends inside a value")]
    Truncated,

    #[error("varint is longer than 64 bits")]
    VarintOverflow,

    #[error("unsupported wire type {0}")]
    UnsupportedWireType(u8),

    #[error("invalid field number {0}")]
    InvalidFieldNumber(u64),

    #[error("length {length} exceeds the {remaining} remaining bytes")]
    LengthOutOfRange { length: u64, remaining: usize },
}
