use thiserror::Error;

/// Codec errors.
///
/// These never cross the public formatting functions; they are logged and
/// replaced by a display default. Lower-level parsers return them so callers
/// that want strict behavior can use `?`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid base64: {0}")]
    InvalidBase64(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid calldata: {0}")]
    InvalidCalldata(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("arithmetic overflow: {0}")]
    Overflow(String),
}
