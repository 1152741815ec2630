//! Codec error types.

use thiserror::Error;

use crate::json::JsonError;
use crate::msgpack::MsgPackError;
use crate::value::ValueKind;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// No write handler is registered for this value kind and it has no
    /// ground representation. A configuration error, fatal for the encode.
    #[error("no write handler registered for {0:?} values")]
    Unencodable(ValueKind),

    /// A tag/rep shape on the wire matches no registered form. Only an
    /// unrecognized tag on a well-formed pair degrades to a tagged value;
    /// a malformed shape is fatal.
    #[error("malformed tag form: {0}")]
    MalformedTag(String),

    /// A registered tag carried a representation its read handler cannot
    /// interpret.
    #[error("invalid representation for tag {tag:?}: {rep}")]
    InvalidRep { tag: String, rep: String },

    /// A cache code referenced an index that was never registered:
    /// the stream is corrupt or the caches have desynchronized.
    #[error("cache code {0:?} does not resolve to a cached value")]
    CacheDesync(String),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error(transparent)]
    MsgPack(#[from] MsgPackError),
}

impl Error {
    pub(crate) fn invalid_rep(tag: &str, rep: impl std::fmt::Display) -> Self {
        Error::InvalidRep {
            tag: tag.to_owned(),
            rep: rep.to_string(),
        }
    }
}
