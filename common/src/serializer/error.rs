use thiserror::Error;

/// Errors raised while decoding a byte buffer.
///
/// Every read goes through [`super::Reader`], which checks the remaining
/// length before touching the buffer, so a truncated or malformed account
/// always surfaces as one of these values and never as a partial record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Not enough bytes: needed {needed}, {remaining} remaining")]
    InvalidSize { needed: usize, remaining: usize },

    #[error("Invalid boolean byte: {0}")]
    InvalidBool(u8),

    #[error("Invalid {kind} ordinal: {value}")]
    InvalidEnum { kind: &'static str, value: u8 },

    #[error("Invalid UTF-8 in string field")]
    InvalidUtf8,

    #[error("Byte field too large: {len} bytes, maximum: {max} bytes")]
    ExceedsMaxBytesSize { len: usize, max: usize },
}

/// Decoding failure of an account record.
pub type DecodeError = ReaderError;

pub type DecodeResult<T> = Result<T, DecodeError>;
