//! JSON format adapter: renders node trees to UTF-8 JSON bytes and parses
//! them back.
//!
//! One encoder serves both wire flavors: compact (maps as `"^ "`-marked
//! arrays, tag/rep as two-element arrays) and verbose (native objects,
//! single-entry tag objects, stringified keys). One decoder reads either,
//! since the shapes are disjoint on the wire.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;
pub use error::JsonError;
