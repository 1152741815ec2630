//! Tag decoder: recursive, cache-aware translation of parsed node trees
//! back into application values.

use crate::cache::{is_cache_code, ReadCache, MAP_AS_ARRAY_MARKER};
use crate::error::Error;
use crate::node::Node;
use crate::registry::Registry;
use crate::value::Value;

/// Per-stream tag decoder. Owns the stream's [`ReadCache`]; the registry
/// is shared and read-only.
///
/// One reader handles compact and verbose input alike: verbose streams
/// simply never contain cache codes, and both tag/rep shapes (two-element
/// array, single-entry map) are recognized.
pub struct TagReader<'a> {
    registry: &'a Registry,
    cache: ReadCache,
}

impl<'a> TagReader<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            cache: ReadCache::new(),
        }
    }

    pub fn decode_top(&mut self, node: Node) -> Result<Value, Error> {
        self.decode(node, false)
    }

    fn decode(&mut self, node: Node, as_map_key: bool) -> Result<Value, Error> {
        match node {
            Node::Null => Ok(Value::Null),
            Node::Bool(b) => Ok(Value::Bool(b)),
            Node::Int(i) => Ok(Value::Int(i)),
            Node::Float(f) => Ok(Value::Float(f)),
            Node::Bytes(b) => Ok(Value::Bytes(b)),
            Node::Str(s) => self.decode_string(s, as_map_key),
            Node::Array(items) => self.decode_array(items),
            Node::Map(pairs) => self.decode_map(pairs),
            Node::Tag { tag, rep } => match tag.strip_prefix("~#") {
                Some(name) => self.decode_tagged(&name.to_owned(), *rep),
                None => Err(Error::MalformedTag(tag)),
            },
        }
    }

    fn decode_string(&mut self, s: String, as_map_key: bool) -> Result<Value, Error> {
        if is_cache_code(&s) {
            let resolved = self.cache.resolve(&s)?.to_owned();
            return self.parse_string(resolved, as_map_key);
        }
        self.cache.cache(&s, as_map_key);
        self.parse_string(s, as_map_key)
    }

    fn parse_string(&mut self, s: String, _as_map_key: bool) -> Result<Value, Error> {
        if !s.starts_with('~') {
            return Ok(Value::Str(s));
        }
        let mut chars = s.chars();
        chars.next(); // the '~'
        let Some(tag_char) = chars.next() else {
            return Err(Error::MalformedTag(s));
        };
        match tag_char {
            '~' | '^' | '`' => Ok(Value::Str(s[1..].to_owned())),
            // A composite tag string never stands alone in scalar
            // position; the array/map forms intercept it first.
            '#' => Err(Error::MalformedTag(s)),
            _ => {
                let rep = chars.as_str().to_owned();
                let tag = tag_char.to_string();
                match self.registry.resolve_reader(&tag) {
                    Some(h) => h.from_rep(Value::Str(rep)),
                    None => Ok(Value::tagged(tag, Value::Str(rep))),
                }
            }
        }
    }

    fn decode_array(&mut self, mut items: Vec<Node>) -> Result<Value, Error> {
        if items.first() == Some(&Node::Str(MAP_AS_ARRAY_MARKER.to_owned())) {
            return self.decode_pairs(items.split_off(1));
        }
        if items.len() == 2 {
            if let Node::Str(head) = &items[0] {
                if let Some(tag) = self.tag_of(head)? {
                    let rep = items.pop().unwrap_or(Node::Null);
                    return self.decode_tagged(&tag, rep);
                }
            }
        }
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            out.push(self.decode(item, false)?);
        }
        Ok(Value::Array(out))
    }

    fn decode_map(&mut self, mut pairs: Vec<(Node, Node)>) -> Result<Value, Error> {
        if pairs.len() == 1 {
            if let (Node::Str(key), _) = &pairs[0] {
                if let Some(tag) = self.tag_of(key)? {
                    let (_, rep) = pairs.pop().unwrap_or((Node::Null, Node::Null));
                    return self.decode_tagged(&tag, rep);
                }
            }
        }
        let mut out = Vec::with_capacity(pairs.len());
        for (k, v) in pairs {
            let key = self.decode(k, true)?;
            let value = self.decode(v, false)?;
            out.push((key, value));
        }
        Ok(Value::Map(out))
    }

    /// Checks whether a candidate head string is a composite tag, looking
    /// through cache codes. A literal tag string is registered here, in
    /// its wire position, before the rep is decoded.
    fn tag_of(&mut self, head: &str) -> Result<Option<String>, Error> {
        if is_cache_code(head) {
            let resolved = self.cache.resolve(head)?;
            return Ok(resolved.strip_prefix("~#").map(str::to_owned));
        }
        match head.strip_prefix("~#") {
            Some(name) => {
                let tag = name.to_owned();
                self.cache.cache(head, false);
                Ok(Some(tag))
            }
            None => Ok(None),
        }
    }

    fn decode_tagged(&mut self, tag: &str, rep_node: Node) -> Result<Value, Error> {
        let rep = self.decode(rep_node, false)?;
        match self.registry.resolve_reader(tag) {
            Some(h) => h.from_rep(rep),
            None => Ok(Value::tagged(tag, rep)),
        }
    }

    fn decode_pairs(&mut self, items: Vec<Node>) -> Result<Value, Error> {
        if items.len() % 2 != 0 {
            return Err(Error::MalformedTag(format!(
                "map-as-array with {} elements after marker",
                items.len()
            )));
        }
        let mut out = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
            let key = self.decode(k, true)?;
            let value = self.decode(v, false)?;
            out.push((key, value));
        }
        Ok(Value::Map(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(node: Node) -> Result<Value, Error> {
        let registry = Registry::default();
        TagReader::new(&registry).decode_top(node)
    }

    #[test]
    fn ground_nodes_pass_through() {
        assert_eq!(decode(Node::Int(5)).unwrap(), Value::Int(5));
        assert_eq!(decode(Node::Null).unwrap(), Value::Null);
        assert_eq!(
            decode(Node::Bytes(vec![1, 2])).unwrap(),
            Value::Bytes(vec![1, 2])
        );
    }

    #[test]
    fn scalar_tag_strings_dispatch() {
        assert_eq!(
            decode(Node::Str("~:kw".into())).unwrap(),
            Value::keyword("kw")
        );
        assert_eq!(
            decode(Node::Str("~$sym".into())).unwrap(),
            Value::symbol("sym")
        );
        assert_eq!(decode(Node::Str("~~tilde".into())).unwrap(), Value::Str("~tilde".into()));
    }

    #[test]
    fn map_as_array_marker() {
        let node = Node::Array(vec![
            Node::Str("^ ".into()),
            Node::Str("a".into()),
            Node::Int(1),
        ]);
        assert_eq!(
            decode(node).unwrap(),
            Value::Map(vec![(Value::Str("a".into()), Value::Int(1))])
        );
    }

    #[test]
    fn odd_map_as_array_is_fatal() {
        let node = Node::Array(vec![Node::Str("^ ".into()), Node::Int(1)]);
        assert!(matches!(decode(node), Err(Error::MalformedTag(_))));
    }

    #[test]
    fn unknown_tag_degrades_to_tagged_value() {
        let node = Node::Array(vec![
            Node::Str("~#point".into()),
            Node::Array(vec![Node::Int(1), Node::Int(2)]),
        ]);
        assert_eq!(
            decode(node).unwrap(),
            Value::tagged("point", Value::Array(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn quote_unwraps() {
        let node = Node::Array(vec![Node::Str("~#'".into()), Node::Str("hello".into())]);
        assert_eq!(decode(node).unwrap(), Value::Str("hello".into()));
    }

    #[test]
    fn cache_code_resolves_repeated_keys() {
        let registry = Registry::default();
        let mut reader = TagReader::new(&registry);
        let node = Node::Array(vec![
            Node::Array(vec![
                Node::Str("^ ".into()),
                Node::Str("abcd".into()),
                Node::Int(1),
            ]),
            Node::Array(vec![
                Node::Str("^ ".into()),
                Node::Str("^0".into()),
                Node::Int(2),
            ]),
        ]);
        let v = reader.decode_top(node).unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Map(vec![(Value::Str("abcd".into()), Value::Int(1))]),
                Value::Map(vec![(Value::Str("abcd".into()), Value::Int(2))]),
            ])
        );
    }

    #[test]
    fn unregistered_cache_code_is_fatal() {
        assert!(matches!(
            decode(Node::Str("^5".into())),
            Err(Error::CacheDesync(_))
        ));
    }

    #[test]
    fn single_entry_tag_map_form() {
        let node = Node::Map(vec![(
            Node::Str("~#set".into()),
            Node::Array(vec![Node::Int(1), Node::Int(2)]),
        )]);
        assert_eq!(
            decode(node).unwrap(),
            Value::Set(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn bare_composite_tag_string_is_fatal() {
        assert!(matches!(
            decode(Node::Str("~#oops".into())),
            Err(Error::MalformedTag(_))
        ));
    }
}
