//! JSON adapter error type.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonError {
    #[error("invalid json at byte {0}")]
    Invalid(usize),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8 in json input")]
    InvalidUtf8,
    #[error("invalid string escape at byte {0}")]
    InvalidEscape(usize),
    #[error("map key cannot be rendered as a json object key")]
    NonStringKey,
}
