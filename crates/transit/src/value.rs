//! [`Value`] — the application-level value model the codec encodes and decodes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Carrier for a tag/rep pair whose tag has no registered read handler.
///
/// Re-encoding a `TaggedValue` reproduces the original tag/rep form
/// unchanged, so unknown extensions pass through losslessly.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedValue {
    pub tag: String,
    pub value: Value,
}

/// Application value spanning every transit semantic type.
///
/// Ground types (null, booleans, i64 integers, floats, strings, bytes,
/// arrays, maps) map onto a target format's native types; the rest are
/// extension types and always travel tag-encoded.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    /// Integer within the native i64 range.
    Int(i64),
    /// Floating-point number, including NaN and ±Infinity.
    Float(f64),
    /// Integer outside the i64 range (`~n` on the wire).
    BigInt(i128),
    /// Arbitrary-precision decimal, kept in exact decimal-string form.
    BigDec(String),
    Str(String),
    Bytes(Vec<u8>),
    Keyword(String),
    Symbol(String),
    /// Point in time with millisecond wire precision.
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Uri(String),
    Char(char),
    Array(Vec<Value>),
    /// Ordered key/value pairs. The codec preserves pair order; it does
    /// not deduplicate keys.
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    List(Vec<Value>),
    /// Unknown-extension fallback.
    Tagged(Box<TaggedValue>),
}

/// Discriminant of a [`Value`], used as the write-handler registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    BigInt,
    BigDec,
    Str,
    Bytes,
    Keyword,
    Symbol,
    Timestamp,
    Uuid,
    Uri,
    Char,
    Array,
    Map,
    Set,
    List,
    Tagged,
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::BigInt(_) => ValueKind::BigInt,
            Value::BigDec(_) => ValueKind::BigDec,
            Value::Str(_) => ValueKind::Str,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Keyword(_) => ValueKind::Keyword,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Timestamp(_) => ValueKind::Timestamp,
            Value::Uuid(_) => ValueKind::Uuid,
            Value::Uri(_) => ValueKind::Uri,
            Value::Char(_) => ValueKind::Char,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Set(_) => ValueKind::Set,
            Value::List(_) => ValueKind::List,
            Value::Tagged(_) => ValueKind::Tagged,
        }
    }

    /// True for values that cannot serve as a plain map key and force the
    /// whole map into the `cmap` representation.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Map(_) | Value::Set(_) | Value::List(_) | Value::Tagged(_)
        )
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Value::Keyword(name.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn tagged(tag: impl Into<String>, value: Value) -> Self {
        Value::Tagged(Box::new(TaggedValue {
            tag: tag.into(),
            value,
        }))
    }

    /// Builds a timestamp from milliseconds since the Unix epoch.
    ///
    /// Returns `None` when the instant is outside chrono's representable
    /// range.
    pub fn timestamp_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(Value::Timestamp)
    }
}

// NaN compares equal to NaN so round-trips over special numbers hold.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::BigDec(a), Value::BigDec(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Keyword(a), Value::Keyword(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) => a == b,
            (Value::Uri(a), Value::Uri(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tagged(a), Value::Tagged(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_equals_nan() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(f64::NAN), Value::Float(1.0));
        assert_eq!(Value::Float(f64::INFINITY), Value::Float(f64::INFINITY));
    }

    #[test]
    fn composite_key_detection() {
        assert!(Value::Array(vec![]).is_composite());
        assert!(Value::tagged("point", Value::Null).is_composite());
        assert!(!Value::keyword("a").is_composite());
        assert!(!Value::Bytes(vec![1, 2]).is_composite());
    }

    #[test]
    fn timestamp_millis_roundtrip() {
        let v = Value::timestamp_millis(482196050052).unwrap();
        match v {
            Value::Timestamp(dt) => assert_eq!(dt.timestamp_millis(), 482196050052),
            _ => panic!("expected timestamp"),
        }
    }
}
