//! MessagePack adapter error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MsgPackError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("invalid marker byte at offset {0}")]
    InvalidByte(usize),
    #[error("unsupported marker 0x{0:02x}")]
    UnsupportedMarker(u8),
    #[error("unsigned integer {0} does not fit in i64")]
    IntOutOfRange(u64),
}
