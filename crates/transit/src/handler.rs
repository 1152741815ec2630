//! Write and read handlers for the extension semantic types.
//!
//! A write handler turns an application value into a tag plus a
//! representation; a read handler is the inverse, keyed by tag string.
//! Ground types never pass through handlers.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Error;
use crate::value::Value;

/// Capability set implemented per semantic type.
///
/// `tag` names the semantic type; `rep` yields an encodable representation
/// (recursively dispatched); `string_rep` yields the compact scalar string
/// form when one exists; `verbose_handler` may substitute a more readable
/// handler when writing verbose output.
pub trait WriteHandler: Send + Sync {
    fn tag(&self, v: &Value) -> String;
    fn rep(&self, v: &Value) -> Value;
    fn string_rep(&self, v: &Value) -> Option<String>;
    fn verbose_handler(&self) -> Option<Arc<dyn WriteHandler>> {
        None
    }
}

/// Rebuilds an application value from a decoded representation.
pub trait ReadHandler: Send + Sync {
    fn from_rep(&self, rep: Value) -> Result<Value, Error>;
}

impl<F> ReadHandler for F
where
    F: Fn(Value) -> Result<Value, Error> + Send + Sync,
{
    fn from_rep(&self, rep: Value) -> Result<Value, Error> {
        self(rep)
    }
}

/// Plain-function read handler, the shape every built-in reader uses.
pub type ReadFn = fn(Value) -> Result<Value, Error>;

const ISO_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

// ---- write handlers ----

pub struct KeywordHandler;

impl WriteHandler for KeywordHandler {
    fn tag(&self, _v: &Value) -> String {
        ":".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::Keyword(name) => Value::Str(name.clone()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Keyword(name) => Some(name.clone()),
            _ => None,
        }
    }
}

pub struct SymbolHandler;

impl WriteHandler for SymbolHandler {
    fn tag(&self, _v: &Value) -> String {
        "$".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::Symbol(name) => Value::Str(name.clone()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Symbol(name) => Some(name.clone()),
            _ => None,
        }
    }
}

pub struct BigIntHandler;

impl WriteHandler for BigIntHandler {
    fn tag(&self, _v: &Value) -> String {
        "n".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::BigInt(i) => Value::Str(i.to_string()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::BigInt(i) => Some(i.to_string()),
            _ => None,
        }
    }
}

pub struct BigDecHandler;

impl WriteHandler for BigDecHandler {
    fn tag(&self, _v: &Value) -> String {
        "f".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::BigDec(d) => Value::Str(d.clone()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::BigDec(d) => Some(d.clone()),
            _ => None,
        }
    }
}

/// Compact timestamp: milliseconds since the epoch (`~m`).
pub struct TimeHandler;

impl WriteHandler for TimeHandler {
    fn tag(&self, _v: &Value) -> String {
        "m".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::Timestamp(dt) => Value::Int(dt.timestamp_millis()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Timestamp(dt) => Some(dt.timestamp_millis().to_string()),
            _ => None,
        }
    }
    fn verbose_handler(&self) -> Option<Arc<dyn WriteHandler>> {
        Some(Arc::new(VerboseTimeHandler))
    }
}

/// Verbose timestamp: ISO-8601 with millisecond precision (`~t`).
pub struct VerboseTimeHandler;

impl WriteHandler for VerboseTimeHandler {
    fn tag(&self, _v: &Value) -> String {
        "t".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match self.string_rep(v) {
            Some(s) => Value::Str(s),
            None => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Timestamp(dt) => Some(dt.format(ISO_MILLIS).to_string()),
            _ => None,
        }
    }
}

pub struct UuidHandler;

impl WriteHandler for UuidHandler {
    fn tag(&self, _v: &Value) -> String {
        "u".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match self.string_rep(v) {
            Some(s) => Value::Str(s),
            None => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Uuid(u) => Some(u.to_string()),
            _ => None,
        }
    }
}

pub struct UriHandler;

impl WriteHandler for UriHandler {
    fn tag(&self, _v: &Value) -> String {
        "r".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::Uri(u) => Value::Str(u.clone()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Uri(u) => Some(u.clone()),
            _ => None,
        }
    }
}

pub struct CharHandler;

impl WriteHandler for CharHandler {
    fn tag(&self, _v: &Value) -> String {
        "c".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match self.string_rep(v) {
            Some(s) => Value::Str(s),
            None => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Char(c) => Some(c.to_string()),
            _ => None,
        }
    }
}

/// NaN and the infinities (`~z`); finite floats are ground and never
/// reach a handler.
pub struct SpecialNumberHandler;

impl WriteHandler for SpecialNumberHandler {
    fn tag(&self, _v: &Value) -> String {
        "z".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match self.string_rep(v) {
            Some(s) => Value::Str(s),
            None => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Float(f) if f.is_nan() => Some("NaN".to_owned()),
            Value::Float(f) if *f == f64::INFINITY => Some("INF".to_owned()),
            Value::Float(f) if *f == f64::NEG_INFINITY => Some("-INF".to_owned()),
            _ => None,
        }
    }
}

pub struct SetHandler;

impl WriteHandler for SetHandler {
    fn tag(&self, _v: &Value) -> String {
        "set".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::Set(items) => Value::Array(items.clone()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, _v: &Value) -> Option<String> {
        None
    }
}

pub struct ListHandler;

impl WriteHandler for ListHandler {
    fn tag(&self, _v: &Value) -> String {
        "list".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::List(items) => Value::Array(items.clone()),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, _v: &Value) -> Option<String> {
        None
    }
}

/// Map whose keys include composites: rep is the flattened
/// `[k1, v1, k2, v2, …]` array.
pub struct CmapHandler;

impl WriteHandler for CmapHandler {
    fn tag(&self, _v: &Value) -> String {
        "cmap".to_owned()
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::Map(pairs) => Value::Array(
                pairs
                    .iter()
                    .flat_map(|(k, v)| [k.clone(), v.clone()])
                    .collect(),
            ),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, _v: &Value) -> Option<String> {
        None
    }
}

/// Pass-through for unknown-extension values: re-emits the carried tag
/// and rep exactly as they were decoded.
pub struct TaggedPassthroughHandler;

impl WriteHandler for TaggedPassthroughHandler {
    fn tag(&self, v: &Value) -> String {
        match v {
            Value::Tagged(t) => t.tag.clone(),
            _ => String::new(),
        }
    }
    fn rep(&self, v: &Value) -> Value {
        match v {
            Value::Tagged(t) => t.value.clone(),
            _ => Value::Null,
        }
    }
    fn string_rep(&self, v: &Value) -> Option<String> {
        match v {
            Value::Tagged(t) if t.tag.chars().count() == 1 => match &t.value {
                Value::Str(s) => Some(s.clone()),
                _ => None,
            },
            _ => None,
        }
    }
}

// ---- read handlers ----

fn expect_str(tag: &str, rep: Value) -> Result<String, Error> {
    match rep {
        Value::Str(s) => Ok(s),
        other => Err(Error::invalid_rep(tag, format!("{other:?}"))),
    }
}

pub fn read_null(_rep: Value) -> Result<Value, Error> {
    Ok(Value::Null)
}

pub fn read_bool(rep: Value) -> Result<Value, Error> {
    match rep {
        Value::Bool(b) => Ok(Value::Bool(b)),
        Value::Str(s) => match s.as_str() {
            "t" => Ok(Value::Bool(true)),
            "f" => Ok(Value::Bool(false)),
            _ => Err(Error::invalid_rep("?", s)),
        },
        other => Err(Error::invalid_rep("?", format!("{other:?}"))),
    }
}

pub fn read_int(rep: Value) -> Result<Value, Error> {
    match rep {
        Value::Int(i) => Ok(Value::Int(i)),
        Value::Str(s) => s
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| Error::invalid_rep("i", s)),
        other => Err(Error::invalid_rep("i", format!("{other:?}"))),
    }
}

pub fn read_float(rep: Value) -> Result<Value, Error> {
    match rep {
        Value::Float(f) => Ok(Value::Float(f)),
        Value::Int(i) => Ok(Value::Float(i as f64)),
        Value::Str(s) => s
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| Error::invalid_rep("d", s)),
        other => Err(Error::invalid_rep("d", format!("{other:?}"))),
    }
}

pub fn read_bytes(rep: Value) -> Result<Value, Error> {
    let s = expect_str("b", rep)?;
    BASE64
        .decode(s.as_bytes())
        .map(Value::Bytes)
        .map_err(|_| Error::invalid_rep("b", s))
}

pub fn read_keyword(rep: Value) -> Result<Value, Error> {
    expect_str(":", rep).map(Value::Keyword)
}

pub fn read_symbol(rep: Value) -> Result<Value, Error> {
    expect_str("$", rep).map(Value::Symbol)
}

pub fn read_big_int(rep: Value) -> Result<Value, Error> {
    let s = expect_str("n", rep)?;
    s.parse::<i128>()
        .map(Value::BigInt)
        .map_err(|_| Error::invalid_rep("n", s))
}

pub fn read_big_dec(rep: Value) -> Result<Value, Error> {
    expect_str("f", rep).map(Value::BigDec)
}

pub fn read_time_millis(rep: Value) -> Result<Value, Error> {
    let millis = match rep {
        Value::Int(i) => i,
        Value::Str(s) => s
            .parse::<i64>()
            .map_err(|_| Error::invalid_rep("m", s))?,
        other => return Err(Error::invalid_rep("m", format!("{other:?}"))),
    };
    Value::timestamp_millis(millis).ok_or_else(|| Error::invalid_rep("m", millis))
}

pub fn read_time_iso(rep: Value) -> Result<Value, Error> {
    let s = expect_str("t", rep)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| Value::Timestamp(dt.with_timezone(&Utc)))
        .map_err(|_| Error::invalid_rep("t", s))
}

pub fn read_uuid(rep: Value) -> Result<Value, Error> {
    let s = expect_str("u", rep)?;
    Uuid::parse_str(&s)
        .map(Value::Uuid)
        .map_err(|_| Error::invalid_rep("u", s))
}

pub fn read_uri(rep: Value) -> Result<Value, Error> {
    expect_str("r", rep).map(Value::Uri)
}

pub fn read_char(rep: Value) -> Result<Value, Error> {
    let s = expect_str("c", rep)?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Char(c)),
        _ => Err(Error::invalid_rep("c", s)),
    }
}

pub fn read_special_number(rep: Value) -> Result<Value, Error> {
    let s = expect_str("z", rep)?;
    match s.as_str() {
        "NaN" => Ok(Value::Float(f64::NAN)),
        "INF" => Ok(Value::Float(f64::INFINITY)),
        "-INF" => Ok(Value::Float(f64::NEG_INFINITY)),
        _ => Err(Error::invalid_rep("z", s)),
    }
}

pub fn read_quote(rep: Value) -> Result<Value, Error> {
    Ok(rep)
}

pub fn read_set(rep: Value) -> Result<Value, Error> {
    match rep {
        Value::Array(items) => Ok(Value::Set(items)),
        other => Err(Error::invalid_rep("set", format!("{other:?}"))),
    }
}

pub fn read_list(rep: Value) -> Result<Value, Error> {
    match rep {
        Value::Array(items) => Ok(Value::List(items)),
        other => Err(Error::invalid_rep("list", format!("{other:?}"))),
    }
}

pub fn read_cmap(rep: Value) -> Result<Value, Error> {
    match rep {
        Value::Array(items) if items.len() % 2 == 0 => {
            let mut pairs = Vec::with_capacity(items.len() / 2);
            let mut iter = items.into_iter();
            while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
                pairs.push((k, v));
            }
            Ok(Value::Map(pairs))
        }
        other => Err(Error::invalid_rep("cmap", format!("{other:?}"))),
    }
}
