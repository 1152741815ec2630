//! `MsgPackEncoder` — writes a node tree as MessagePack bytes.

use transit_buffers::Writer;

use crate::node::Node;

pub struct MsgPackEncoder {
    pub writer: Writer,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn encode(&mut self, node: &Node) -> Vec<u8> {
        self.write_any(node);
        self.writer.flush()
    }

    pub fn write_any(&mut self, node: &Node) {
        match node {
            Node::Null => self.writer.u8(0xc0),
            Node::Bool(b) => self.writer.u8(if *b { 0xc3 } else { 0xc2 }),
            Node::Int(i) => self.write_integer(*i),
            Node::Float(f) => self.writer.u8f64(0xcb, *f),
            Node::Bytes(b) => self.write_bin(b),
            Node::Str(s) => self.write_str(s),
            Node::Array(items) => {
                self.write_arr_hdr(items.len());
                for item in items {
                    self.write_any(item);
                }
            }
            Node::Map(pairs) => {
                self.write_map_hdr(pairs.len());
                for (k, v) in pairs {
                    self.write_any(k);
                    self.write_any(v);
                }
            }
            Node::Tag { tag, rep } => {
                self.write_arr_hdr(2);
                self.write_str(tag);
                self.write_any(rep);
            }
        }
    }

    /// Full-width integer encoding. Values outside u32 range keep their
    /// integral representation instead of degrading to float.
    pub fn write_integer(&mut self, int: i64) {
        if int >= 0 {
            if int <= 0x7f {
                self.writer.u8(int as u8);
            } else if int <= 0xff {
                self.writer.u16(0xcc00 | int as u16);
            } else if int <= 0xffff {
                self.writer.u8u16(0xcd, int as u16);
            } else if int <= 0xffff_ffff {
                self.writer.u8u32(0xce, int as u32);
            } else {
                self.writer.u8u64(0xd3, int as u64);
            }
        } else if int >= -0x20 {
            self.writer.u8(int as i8 as u8);
        } else if int >= -0x80 {
            self.writer.u8(0xd0);
            self.writer.i8(int as i8);
        } else if int >= -0x8000 {
            self.writer.u8(0xd1);
            self.writer.i16(int as i16);
        } else if int >= -0x8000_0000 {
            self.writer.u8(0xd2);
            self.writer.i32(int as i32);
        } else {
            self.writer.u8(0xd3);
            self.writer.i64(int);
        }
    }

    pub fn write_str_hdr(&mut self, length: usize) {
        if length <= 0x1f {
            self.writer.u8(0xa0 | length as u8);
        } else if length <= 0xff {
            self.writer.u16(0xd900 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xda, length as u16);
        } else {
            self.writer.u8u32(0xdb, length as u32);
        }
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_str_hdr(s.len());
        self.writer.buf(s.as_bytes());
    }

    pub fn write_arr_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(0x90 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(0xdc, length as u16);
        } else {
            self.writer.u8u32(0xdd, length as u32);
        }
    }

    pub fn write_map_hdr(&mut self, length: usize) {
        if length <= 0xf {
            self.writer.u8(0x80 | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(0xde, length as u16);
        } else {
            self.writer.u8u32(0xdf, length as u32);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        let length = buf.len();
        if length <= 0xff {
            self.writer.u16(0xc400 | length as u16);
        } else if length <= 0xffff {
            self.writer.u8u16(0xc5, length as u16);
        } else {
            self.writer.u8u32(0xc6, length as u32);
        }
        self.writer.buf(buf);
    }
}
