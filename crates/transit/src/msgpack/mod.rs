//! MessagePack format adapter.
//!
//! Maps are native msgpack maps with arbitrary node keys, tag/rep pairs
//! render as two-element arrays, and strings carry whatever cache codes
//! the tag encoder put in them. Extension markers are not part of the
//! wire format and are rejected on decode.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::MsgPackDecoder;
pub use encoder::MsgPackEncoder;
pub use error::MsgPackError;
