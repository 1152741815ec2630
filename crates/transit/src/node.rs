//! [`Node`] — the format-neutral intermediate tree between the tag
//! encoder/decoder and the byte-level format adapters.

/// Intermediate node produced by the tag encoder and consumed by the tag
/// decoder.
///
/// Every string inside a node tree is a final wire string: escaped,
/// tag-prefixed, and (in caching modes) cache-substituted. [`Node::Tag`]
/// is the one deferred decision — the adapter picks the array form
/// (compact JSON, MessagePack) or the single-entry object form (verbose
/// JSON) for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Str(String),
    Array(Vec<Node>),
    /// Ordered key/value pairs. Keys may be non-string nodes; the adapter
    /// decides how (or whether) to stringify them.
    Map(Vec<(Node, Node)>),
    /// Tag/rep pair awaiting format-specific rendering. `tag` is the full
    /// wire tag string (`~#set`, or a cache code standing in for one).
    Tag { tag: String, rep: Box<Node> },
}

impl Node {
    /// True for nodes rendered as a JSON array/object or MessagePack
    /// array/map. Composites are exempt from top-level quoting.
    pub fn is_composite(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Map(_) | Node::Tag { .. })
    }
}
