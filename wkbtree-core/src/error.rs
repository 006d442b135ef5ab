use thiserror::Error;

#[derive(Debug, Error)]
pub enum WkbTreeError {
    #[error("invalid byte order marker: {0}")]
    InvalidByteOrder(u8),

    #[error("multi-byte read before a byte order was established")]
    UnsetByteOrder,

    #[error("input exhausted: needed {needed} bytes, {available} available at offset {offset}")]
    InsufficientInput {
        needed: usize,
        available: usize,
        offset: usize,
    },

    #[error("unsupported geometry type code: {0}")]
    UnsupportedType(u32),

    #[error("invalid hex input: {0}")]
    InvalidHex(&'static str),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WkbTreeError>;
