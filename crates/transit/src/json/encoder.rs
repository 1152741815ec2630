//! `JsonEncoder` — writes a node tree as UTF-8 JSON bytes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use transit_buffers::Writer;

use super::error::JsonError;
use crate::node::Node;

pub struct JsonEncoder {
    pub writer: Writer,
    verbose: bool,
}

impl JsonEncoder {
    pub fn new(verbose: bool) -> Self {
        Self {
            writer: Writer::new(),
            verbose,
        }
    }

    pub fn encode(&mut self, node: &Node) -> Result<Vec<u8>, JsonError> {
        self.write_any(node)?;
        Ok(self.writer.flush())
    }

    fn write_any(&mut self, node: &Node) -> Result<(), JsonError> {
        match node {
            Node::Null => self.writer.ascii("null"),
            Node::Bool(true) => self.writer.ascii("true"),
            Node::Bool(false) => self.writer.ascii("false"),
            Node::Int(i) => self.writer.ascii(&i.to_string()),
            Node::Float(f) => self.writer.ascii(&format_float(*f)),
            Node::Bytes(b) => self.write_str(&bin_rep(b)),
            Node::Str(s) => self.write_str(s),
            Node::Array(items) => {
                self.writer.u8(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.writer.u8(b',');
                    }
                    self.write_any(item)?;
                }
                self.writer.u8(b']');
            }
            Node::Map(pairs) => {
                if self.verbose {
                    self.write_obj(pairs)?;
                } else {
                    self.write_map_as_array(pairs)?;
                }
            }
            Node::Tag { tag, rep } => {
                if self.verbose {
                    self.writer.u8(b'{');
                    self.write_str(tag);
                    self.writer.u8(b':');
                    self.write_any(rep)?;
                    self.writer.u8(b'}');
                } else {
                    self.writer.u8(b'[');
                    self.write_str(tag);
                    self.writer.u8(b',');
                    self.write_any(rep)?;
                    self.writer.u8(b']');
                }
            }
        }
        Ok(())
    }

    /// Compact map form: `["^ ", k1, v1, …]`. Keys may be any node.
    fn write_map_as_array(&mut self, pairs: &[(Node, Node)]) -> Result<(), JsonError> {
        self.writer.ascii("[\"^ \"");
        for (k, v) in pairs {
            self.writer.u8(b',');
            self.write_any(k)?;
            self.writer.u8(b',');
            self.write_any(v)?;
        }
        self.writer.u8(b']');
        Ok(())
    }

    fn write_obj(&mut self, pairs: &[(Node, Node)]) -> Result<(), JsonError> {
        self.writer.u8(b'{');
        for (i, (k, v)) in pairs.iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            self.write_key(k)?;
            self.writer.u8(b':');
            self.write_any(v)?;
        }
        self.writer.u8(b'}');
        Ok(())
    }

    /// Object keys must be strings; scalar key nodes fall back to their
    /// tagged string forms. Composite keys never reach here — the tag
    /// encoder routes those maps through `cmap`.
    fn write_key(&mut self, node: &Node) -> Result<(), JsonError> {
        match node {
            Node::Str(s) => self.write_str(s),
            Node::Int(i) => self.write_str(&format!("~i{i}")),
            Node::Float(f) => self.write_str(&format!("~d{f}")),
            Node::Bytes(b) => self.write_str(&bin_rep(b)),
            Node::Null => self.write_str("~_"),
            Node::Bool(true) => self.write_str("~?t"),
            Node::Bool(false) => self.write_str("~?f"),
            Node::Array(_) | Node::Map(_) | Node::Tag { .. } => return Err(JsonError::NonStringKey),
        }
        Ok(())
    }

    /// JSON string with escaping. Fast path for short clean ASCII,
    /// serde_json for everything else.
    fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let clean = bytes.len() < 256
            && bytes
                .iter()
                .all(|&b| (32..127).contains(&b) && b != b'"' && b != b'\\');
        if clean {
            self.writer.u8(b'"');
            self.writer.buf(bytes);
            self.writer.u8(b'"');
            return;
        }
        let quoted = serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_owned());
        self.writer.buf(quoted.as_bytes());
    }
}

fn bin_rep(b: &[u8]) -> String {
    format!("~b{}", BASE64.encode(b))
}

/// Floats render with a decimal point or exponent so they parse back as
/// floats, not integers. Non-finite values never reach the adapter.
fn format_float(f: f64) -> String {
    if !f.is_finite() {
        return "null".to_owned();
    }
    if f.fract() == 0.0 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}
