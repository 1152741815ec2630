//! `JsonDecoder` — parses UTF-8 JSON bytes into a node tree.
//!
//! Arrays whose first element is the `"^ "` marker become map nodes here;
//! everything else is structural. Tag detection and cache resolution
//! belong to the tag decoder, not the adapter.

use super::error::JsonError;
use crate::cache::MAP_AS_ARRAY_MARKER;
use crate::node::Node;

pub struct JsonDecoder {
    pub data: Vec<u8>,
    pub x: usize,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            x: 0,
        }
    }

    pub fn decode(&mut self, input: &[u8]) -> Result<Node, JsonError> {
        self.data = input.to_vec();
        self.x = 0;
        self.read_any()
    }

    pub fn read_any(&mut self) -> Result<Node, JsonError> {
        self.skip_whitespace();
        let x = self.x;
        match self.peek()? {
            b'"' => Ok(Node::Str(self.read_str()?)),
            b'[' => self.read_arr(),
            b'{' => self.read_obj(),
            b'n' => self.read_literal(b"null", Node::Null),
            b't' => self.read_literal(b"true", Node::Bool(true)),
            b'f' => self.read_literal(b"false", Node::Bool(false)),
            c if c == b'-' || c.is_ascii_digit() => self.read_num(),
            _ => Err(JsonError::Invalid(x)),
        }
    }

    fn peek(&self) -> Result<u8, JsonError> {
        self.data.get(self.x).copied().ok_or(JsonError::UnexpectedEof)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.data.get(self.x) {
            self.x += 1;
        }
    }

    fn read_literal(&mut self, word: &[u8], node: Node) -> Result<Node, JsonError> {
        if self.data.len() < self.x + word.len() || &self.data[self.x..self.x + word.len()] != word
        {
            return Err(JsonError::Invalid(self.x));
        }
        self.x += word.len();
        Ok(node)
    }

    fn read_num(&mut self) -> Result<Node, JsonError> {
        let start = self.x;
        let len = self.data.len();
        let mut x = self.x;
        let mut is_float = false;

        if x < len && self.data[x] == b'-' {
            x += 1;
        }
        while x < len && self.data[x].is_ascii_digit() {
            x += 1;
        }
        if x < len && self.data[x] == b'.' {
            is_float = true;
            x += 1;
            while x < len && self.data[x].is_ascii_digit() {
                x += 1;
            }
        }
        if x < len && (self.data[x] == b'e' || self.data[x] == b'E') {
            is_float = true;
            x += 1;
            if x < len && (self.data[x] == b'+' || self.data[x] == b'-') {
                x += 1;
            }
            while x < len && self.data[x].is_ascii_digit() {
                x += 1;
            }
        }
        self.x = x;

        let s = std::str::from_utf8(&self.data[start..x]).map_err(|_| JsonError::InvalidUtf8)?;
        if !is_float {
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Node::Int(i));
            }
        }
        s.parse::<f64>()
            .map(Node::Float)
            .map_err(|_| JsonError::Invalid(start))
    }

    fn read_str(&mut self) -> Result<String, JsonError> {
        if self.peek()? != b'"' {
            return Err(JsonError::Invalid(self.x));
        }
        self.x += 1;
        let start = self.x;
        let mut escaped = false;
        loop {
            match self.data.get(self.x) {
                None => return Err(JsonError::UnexpectedEof),
                Some(b'\\') => {
                    escaped = true;
                    self.x += 2; // escape sequence, at minimum one byte
                    if self.x > self.data.len() {
                        return Err(JsonError::UnexpectedEof);
                    }
                }
                Some(b'"') => break,
                Some(_) => self.x += 1,
            }
        }
        let body = &self.data[start..self.x];
        self.x += 1; // closing quote
        decode_string_body(body, escaped, start)
    }

    fn read_arr(&mut self) -> Result<Node, JsonError> {
        self.x += 1; // '['
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek()? {
                b']' => {
                    self.x += 1;
                    break;
                }
                b',' if !items.is_empty() => {
                    self.x += 1;
                }
                _ if items.is_empty() => {}
                _ => return Err(JsonError::Invalid(self.x)),
            }
            self.skip_whitespace();
            if self.peek()? == b']' && items.is_empty() {
                self.x += 1;
                break;
            }
            items.push(self.read_any()?);
        }

        // Compact map form.
        if matches!(items.first(), Some(Node::Str(s)) if s == MAP_AS_ARRAY_MARKER) {
            let rest = items.split_off(1);
            if rest.len() % 2 != 0 {
                return Err(JsonError::Invalid(self.x));
            }
            let mut pairs = Vec::with_capacity(rest.len() / 2);
            let mut iter = rest.into_iter();
            while let (Some(k), Some(v)) = (iter.next(), iter.next()) {
                pairs.push((k, v));
            }
            return Ok(Node::Map(pairs));
        }
        Ok(Node::Array(items))
    }

    fn read_obj(&mut self) -> Result<Node, JsonError> {
        self.x += 1; // '{'
        let mut pairs: Vec<(Node, Node)> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek()? {
                b'}' => {
                    self.x += 1;
                    return Ok(Node::Map(pairs));
                }
                b',' if !pairs.is_empty() => {
                    self.x += 1;
                    self.skip_whitespace();
                }
                _ if pairs.is_empty() => {}
                _ => return Err(JsonError::Invalid(self.x)),
            }
            if self.peek()? == b'}' && pairs.is_empty() {
                self.x += 1;
                return Ok(Node::Map(pairs));
            }
            let key = self.read_str()?;
            self.skip_whitespace();
            if self.peek()? != b':' {
                return Err(JsonError::Invalid(self.x));
            }
            self.x += 1;
            let value = self.read_any()?;
            pairs.push((Node::Str(key), value));
        }
    }
}

/// Decodes a JSON string body (between the quotes). Escape handling
/// defers to serde_json.
fn decode_string_body(bytes: &[u8], escaped: bool, at: usize) -> Result<String, JsonError> {
    if !escaped {
        return std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| JsonError::InvalidUtf8);
    }
    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'"');
    quoted.extend_from_slice(bytes);
    quoted.push(b'"');
    serde_json::from_slice(&quoted).map_err(|_| JsonError::InvalidEscape(at))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Node {
        JsonDecoder::new().decode(s.as_bytes()).unwrap()
    }

    #[test]
    fn scalars() {
        assert_eq!(parse("null"), Node::Null);
        assert_eq!(parse("true"), Node::Bool(true));
        assert_eq!(parse("-17"), Node::Int(-17));
        assert_eq!(parse("2.5"), Node::Float(2.5));
        assert_eq!(parse("1.0"), Node::Float(1.0));
        assert_eq!(parse("1e3"), Node::Float(1000.0));
        assert_eq!(parse("\"hi\""), Node::Str("hi".into()));
    }

    #[test]
    fn escapes_unwind() {
        assert_eq!(parse(r#""a\"b""#), Node::Str("a\"b".into()));
        assert_eq!(parse(r#""é""#), Node::Str("é".into()));
    }

    #[test]
    fn arrays_and_nesting() {
        assert_eq!(
            parse("[1,[2,3],\"x\"]"),
            Node::Array(vec![
                Node::Int(1),
                Node::Array(vec![Node::Int(2), Node::Int(3)]),
                Node::Str("x".into()),
            ])
        );
        assert_eq!(parse("[]"), Node::Array(vec![]));
    }

    #[test]
    fn marker_array_becomes_map() {
        assert_eq!(
            parse(r#"["^ ","a",1]"#),
            Node::Map(vec![(Node::Str("a".into()), Node::Int(1))])
        );
        assert_eq!(parse(r#"["^ "]"#), Node::Map(vec![]));
    }

    #[test]
    fn odd_marker_array_is_invalid() {
        assert!(JsonDecoder::new().decode(br#"["^ ",1]"#).is_err());
    }

    #[test]
    fn objects_become_maps() {
        assert_eq!(
            parse(r#"{"a":1,"b":[true]}"#),
            Node::Map(vec![
                (Node::Str("a".into()), Node::Int(1)),
                (Node::Str("b".into()), Node::Array(vec![Node::Bool(true)])),
            ])
        );
        assert_eq!(parse("{}"), Node::Map(vec![]));
    }

    #[test]
    fn whitespace_tolerated() {
        assert_eq!(
            parse(" [ 1 , 2 ] "),
            Node::Array(vec![Node::Int(1), Node::Int(2)])
        );
    }

    #[test]
    fn truncated_input_is_eof() {
        assert_eq!(
            JsonDecoder::new().decode(b"[1,").unwrap_err(),
            JsonError::UnexpectedEof
        );
    }
}
