//! Tag encoder: recursive, cache-aware translation of application values
//! into the intermediate node tree.

use crate::cache::WriteCache;
use crate::error::Error;
use crate::node::Node;
use crate::registry::Registry;
use crate::value::Value;
use crate::Format;

/// Per-stream tag encoder. Owns the stream's [`WriteCache`]; the registry
/// is shared and read-only.
pub struct TagWriter<'a> {
    registry: &'a Registry,
    cache: WriteCache,
    verbose: bool,
    caching: bool,
}

impl<'a> TagWriter<'a> {
    pub fn new(registry: &'a Registry, format: Format) -> Self {
        let verbose = format == Format::JsonVerbose;
        Self {
            registry,
            cache: WriteCache::new(),
            verbose,
            caching: !verbose,
        }
    }

    /// Encodes a top-level value, wrapping ground scalars in the quote
    /// form. Composites never need quoting.
    pub fn encode_top(&mut self, v: &Value) -> Result<Node, Error> {
        let node = self.encode(v, false)?;
        if node.is_composite() {
            Ok(node)
        } else {
            // "~#'" is 3 chars, below the cacheable minimum, so the quote
            // tag is always literal on the wire.
            Ok(Node::Tag {
                tag: self.convert("~#'".to_owned(), false),
                rep: Box::new(node),
            })
        }
    }

    fn encode(&mut self, v: &Value, as_map_key: bool) -> Result<Node, Error> {
        match v {
            // Ground null/bool must be string-tag-encoded in key position:
            // JSON object keys are strings, and the wire form has to be
            // position-independent across formats.
            Value::Null if as_map_key => Ok(self.string_node("~_".to_owned(), true)),
            Value::Null => Ok(Node::Null),
            Value::Bool(b) if as_map_key => {
                Ok(self.string_node(if *b { "~?t" } else { "~?f" }.to_owned(), true))
            }
            Value::Bool(b) => Ok(Node::Bool(*b)),
            Value::Int(i) if as_map_key && self.verbose => {
                Ok(self.string_node(format!("~i{i}"), true))
            }
            Value::Int(i) => Ok(Node::Int(*i)),
            Value::Float(f) if f.is_finite() => {
                if as_map_key && self.verbose {
                    Ok(self.string_node(format!("~d{f}"), true))
                } else {
                    Ok(Node::Float(*f))
                }
            }
            // NaN and the infinities go through the `z` handler.
            Value::Float(_) => self.encode_extension(v, as_map_key),
            // Smallest exact representation: a big integer that fits i64
            // narrows to the ground integer form.
            Value::BigInt(i) => match i64::try_from(*i) {
                Ok(narrow) => self.encode(&Value::Int(narrow), as_map_key),
                Err(_) => self.encode_extension(v, as_map_key),
            },
            Value::Str(s) => Ok(self.string_node(escape(s), as_map_key)),
            Value::Bytes(b) if as_map_key => {
                // Key position needs a string form so the read side sees
                // the same cacheable key the write side registered.
                use base64::{engine::general_purpose::STANDARD, Engine as _};
                Ok(self.string_node(format!("~b{}", STANDARD.encode(b)), true))
            }
            Value::Bytes(b) => Ok(Node::Bytes(b.clone())),
            Value::Array(items) => {
                let mut nodes = Vec::with_capacity(items.len());
                for item in items {
                    nodes.push(self.encode(item, false)?);
                }
                Ok(Node::Array(nodes))
            }
            Value::Map(pairs) => {
                if pairs.iter().any(|(k, _)| k.is_composite()) {
                    return self.encode_extension(v, as_map_key);
                }
                let mut nodes = Vec::with_capacity(pairs.len());
                for (k, val) in pairs {
                    let key = self.encode(k, true)?;
                    let value = self.encode(val, false)?;
                    nodes.push((key, value));
                }
                Ok(Node::Map(nodes))
            }
            _ => self.encode_extension(v, as_map_key),
        }
    }

    /// Handler-dispatched path for extension types (and the two ground
    /// kinds with extension fallbacks: non-finite floats, composite-keyed
    /// maps).
    fn encode_extension(&mut self, v: &Value, as_map_key: bool) -> Result<Node, Error> {
        let kind = v.kind();
        let mut handler = self
            .registry
            .resolve_writer(kind)
            .ok_or(Error::Unencodable(kind))?;
        if self.verbose {
            if let Some(vh) = handler.verbose_handler() {
                handler = vh;
            }
        }
        let tag = handler.tag(v);
        if tag.chars().count() == 1 {
            if let Some(srep) = handler.string_rep(v) {
                return Ok(self.string_node(format!("~{tag}{srep}"), as_map_key));
            }
        }
        // Composite form. The tag string hits the cache before the rep is
        // encoded because that is its position in the byte stream.
        let tag_str = self.convert(format!("~#{tag}"), as_map_key);
        let rep = handler.rep(v);
        let rep_node = self.encode(&rep, false)?;
        Ok(Node::Tag {
            tag: tag_str,
            rep: Box::new(rep_node),
        })
    }

    fn string_node(&mut self, s: String, as_map_key: bool) -> Node {
        Node::Str(self.convert(s, as_map_key))
    }

    /// Cache substitution: an already-seen cacheable string becomes its
    /// code; a new eligible one is registered and emitted literally.
    fn convert(&mut self, s: String, as_map_key: bool) -> String {
        if !self.caching {
            return s;
        }
        match self.cache.convert(&s, as_map_key) {
            Some(code) => code,
            None => s,
        }
    }
}

/// Data strings starting with a reserved character get a `~` prefix
/// before anything else looks at them.
fn escape(s: &str) -> String {
    match s.as_bytes().first() {
        Some(b'~') | Some(b'^') | Some(b'`') => format!("~{s}"),
        _ => s.to_owned(),
    }
}
