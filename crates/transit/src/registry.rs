//! Type registry: value kinds to write handlers, tag strings to read
//! handlers.
//!
//! Configured once, then shared immutably (`Arc`) across any number of
//! concurrent encode/decode streams.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::{
    self, BigDecHandler, BigIntHandler, CharHandler, CmapHandler, KeywordHandler, ListHandler,
    ReadFn, ReadHandler, SetHandler, SpecialNumberHandler, SymbolHandler,
    TaggedPassthroughHandler, TimeHandler, UriHandler, UuidHandler, WriteHandler,
};
use crate::value::ValueKind;

pub struct Registry {
    writers: HashMap<ValueKind, Arc<dyn WriteHandler>>,
    readers: HashMap<String, Arc<dyn ReadHandler>>,
}

impl Registry {
    /// A registry with no handlers at all. Useful only as a base for fully
    /// custom configurations; [`Registry::default`] is the normal entry.
    pub fn empty() -> Self {
        Self {
            writers: HashMap::new(),
            readers: HashMap::new(),
        }
    }

    /// Lookup is by exact kind match; a miss means the value cannot be
    /// encoded at all.
    pub fn resolve_writer(&self, kind: ValueKind) -> Option<Arc<dyn WriteHandler>> {
        self.writers.get(&kind).cloned()
    }

    /// Lookup is by exact tag match; a miss degrades to a tagged value on
    /// the read side, never an error.
    pub fn resolve_reader(&self, tag: &str) -> Option<Arc<dyn ReadHandler>> {
        self.readers.get(tag).cloned()
    }

    pub fn register_writer(&mut self, kind: ValueKind, h: Arc<dyn WriteHandler>) {
        self.writers.insert(kind, h);
    }

    pub fn register_reader(&mut self, tag: impl Into<String>, h: Arc<dyn ReadHandler>) {
        self.readers.insert(tag.into(), h);
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut r = Self::empty();

        r.register_writer(ValueKind::Keyword, Arc::new(KeywordHandler));
        r.register_writer(ValueKind::Symbol, Arc::new(SymbolHandler));
        r.register_writer(ValueKind::BigInt, Arc::new(BigIntHandler));
        r.register_writer(ValueKind::BigDec, Arc::new(BigDecHandler));
        r.register_writer(ValueKind::Timestamp, Arc::new(TimeHandler));
        r.register_writer(ValueKind::Uuid, Arc::new(UuidHandler));
        r.register_writer(ValueKind::Uri, Arc::new(UriHandler));
        r.register_writer(ValueKind::Char, Arc::new(CharHandler));
        // Dispatched only for non-finite floats; finite floats are ground.
        r.register_writer(ValueKind::Float, Arc::new(SpecialNumberHandler));
        r.register_writer(ValueKind::Set, Arc::new(SetHandler));
        r.register_writer(ValueKind::List, Arc::new(ListHandler));
        // Dispatched only for maps with composite keys.
        r.register_writer(ValueKind::Map, Arc::new(CmapHandler));
        r.register_writer(ValueKind::Tagged, Arc::new(TaggedPassthroughHandler));

        r.register_reader("_", Arc::new(handler::read_null as ReadFn));
        r.register_reader("?", Arc::new(handler::read_bool as ReadFn));
        r.register_reader("i", Arc::new(handler::read_int as ReadFn));
        r.register_reader("d", Arc::new(handler::read_float as ReadFn));
        r.register_reader("b", Arc::new(handler::read_bytes as ReadFn));
        r.register_reader(":", Arc::new(handler::read_keyword as ReadFn));
        r.register_reader("$", Arc::new(handler::read_symbol as ReadFn));
        r.register_reader("n", Arc::new(handler::read_big_int as ReadFn));
        r.register_reader("f", Arc::new(handler::read_big_dec as ReadFn));
        r.register_reader("m", Arc::new(handler::read_time_millis as ReadFn));
        r.register_reader("t", Arc::new(handler::read_time_iso as ReadFn));
        r.register_reader("u", Arc::new(handler::read_uuid as ReadFn));
        r.register_reader("r", Arc::new(handler::read_uri as ReadFn));
        r.register_reader("c", Arc::new(handler::read_char as ReadFn));
        r.register_reader("z", Arc::new(handler::read_special_number as ReadFn));
        r.register_reader("'", Arc::new(handler::read_quote as ReadFn));
        r.register_reader("set", Arc::new(handler::read_set as ReadFn));
        r.register_reader("list", Arc::new(handler::read_list as ReadFn));
        r.register_reader("cmap", Arc::new(handler::read_cmap as ReadFn));

        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn default_registry_resolves_builtins() {
        let r = Registry::default();
        assert!(r.resolve_writer(ValueKind::Keyword).is_some());
        assert!(r.resolve_reader(":").is_some());
        assert!(r.resolve_reader("cmap").is_some());
        assert!(r.resolve_reader("frobnicate").is_none());
        assert!(r.resolve_writer(ValueKind::Int).is_none()); // ground
    }

    #[test]
    fn caller_registered_reader() {
        let mut r = Registry::default();
        r.register_reader(
            "point",
            Arc::new(|rep: Value| match rep {
                Value::Array(items) if items.len() == 2 => Ok(Value::Array(items)),
                other => Err(crate::Error::invalid_rep("point", format!("{other:?}"))),
            }),
        );
        assert!(r.resolve_reader("point").is_some());
    }
}
