//! Self-describing, extensible value interchange over JSON and
//! MessagePack.
//!
//! Values are encoded through two layers: a format-independent tag
//! encoder that turns application values into an intermediate node tree
//! (applying tags, escaping, and cache substitution), and a format
//! adapter that renders the tree as bytes. Decoding runs the layers in
//! reverse. Custom types plug in through the [`Registry`].
//!
//! ```
//! use transit::{decode, encode, Format, Value};
//!
//! let value = Value::Map(vec![(Value::keyword("name"), Value::Str("ada".into()))]);
//! let bytes = encode(&value, Format::Json).unwrap();
//! assert_eq!(decode(&bytes, Format::Json).unwrap(), value);
//! ```

use std::sync::Arc;

pub mod cache;
pub mod error;
pub mod handler;
pub mod json;
pub mod msgpack;
pub mod node;
pub mod reader;
pub mod registry;
pub mod value;
pub mod writer;

pub use error::Error;
pub use handler::{ReadHandler, WriteHandler};
pub use node::Node;
pub use reader::TagReader;
pub use registry::Registry;
pub use value::{TaggedValue, Value, ValueKind};
pub use writer::TagWriter;

use json::{JsonDecoder, JsonEncoder};
use msgpack::{MsgPackDecoder, MsgPackEncoder};

/// Wire format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Compact JSON: cached, maps as marker arrays.
    Json,
    /// Verbose JSON: human-readable, no caching, native objects.
    JsonVerbose,
    /// Compact MessagePack: cached, native maps and binary.
    MsgPack,
}

impl Format {
    pub fn mime(&self) -> &'static str {
        match self {
            Format::Json => "application/transit+json",
            Format::JsonVerbose => "application/transit+json;verbose",
            Format::MsgPack => "application/transit+msgpack",
        }
    }
}

/// Reusable encoder: a registry plus a format. Each [`encode`](Encoder::encode)
/// call is an independent stream with a fresh cache.
pub struct Encoder {
    registry: Arc<Registry>,
    format: Format,
}

impl Encoder {
    pub fn new(format: Format) -> Self {
        Self::with_registry(Arc::new(Registry::default()), format)
    }

    pub fn with_registry(registry: Arc<Registry>, format: Format) -> Self {
        Self { registry, format }
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, Error> {
        let mut tag_writer = TagWriter::new(&self.registry, self.format);
        let node = tag_writer.encode_top(value)?;
        match self.format {
            Format::Json => Ok(JsonEncoder::new(false).encode(&node)?),
            Format::JsonVerbose => Ok(JsonEncoder::new(true).encode(&node)?),
            Format::MsgPack => Ok(MsgPackEncoder::new().encode(&node)),
        }
    }
}

/// Reusable decoder: a registry plus a format. Each [`decode`](Decoder::decode)
/// call is an independent stream with a fresh cache.
pub struct Decoder {
    registry: Arc<Registry>,
    format: Format,
}

impl Decoder {
    pub fn new(format: Format) -> Self {
        Self::with_registry(Arc::new(Registry::default()), format)
    }

    pub fn with_registry(registry: Arc<Registry>, format: Format) -> Self {
        Self { registry, format }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, Error> {
        let node = match self.format {
            Format::Json | Format::JsonVerbose => JsonDecoder::new().decode(bytes)?,
            Format::MsgPack => MsgPackDecoder::new().decode(bytes)?,
        };
        TagReader::new(&self.registry).decode_top(node)
    }
}

/// One-shot encode with the default registry.
pub fn encode(value: &Value, format: Format) -> Result<Vec<u8>, Error> {
    Encoder::new(format).encode(value)
}

/// One-shot decode with the default registry.
pub fn decode(bytes: &[u8], format: Format) -> Result<Value, Error> {
    Decoder::new(format).decode(bytes)
}
