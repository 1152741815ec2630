//! `MsgPackDecoder` — parses MessagePack bytes into a node tree.

use super::error::MsgPackError;
use crate::node::Node;

pub struct MsgPackDecoder {
    pub data: Vec<u8>,
    pub x: usize,
}

impl Default for MsgPackDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackDecoder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            x: 0,
        }
    }

    pub fn decode(&mut self, input: &[u8]) -> Result<Node, MsgPackError> {
        self.data = input.to_vec();
        self.x = 0;
        self.read_any()
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), MsgPackError> {
        if self.x + n > self.data.len() {
            Err(MsgPackError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn u8(&mut self) -> Result<u8, MsgPackError> {
        self.check(1)?;
        let v = self.data[self.x];
        self.x += 1;
        Ok(v)
    }

    #[inline]
    fn u16(&mut self) -> Result<u16, MsgPackError> {
        self.check(2)?;
        let v = u16::from_be_bytes([self.data[self.x], self.data[self.x + 1]]);
        self.x += 2;
        Ok(v)
    }

    #[inline]
    fn u32(&mut self) -> Result<u32, MsgPackError> {
        self.check(4)?;
        let v = u32::from_be_bytes([
            self.data[self.x],
            self.data[self.x + 1],
            self.data[self.x + 2],
            self.data[self.x + 3],
        ]);
        self.x += 4;
        Ok(v)
    }

    #[inline]
    fn u64(&mut self) -> Result<u64, MsgPackError> {
        let hi = self.u32()? as u64;
        let lo = self.u32()? as u64;
        Ok((hi << 32) | lo)
    }

    #[inline]
    fn i8(&mut self) -> Result<i8, MsgPackError> {
        Ok(self.u8()? as i8)
    }

    #[inline]
    fn i16(&mut self) -> Result<i16, MsgPackError> {
        Ok(self.u16()? as i16)
    }

    #[inline]
    fn i32(&mut self) -> Result<i32, MsgPackError> {
        Ok(self.u32()? as i32)
    }

    #[inline]
    fn i64(&mut self) -> Result<i64, MsgPackError> {
        Ok(self.u64()? as i64)
    }

    #[inline]
    fn f32(&mut self) -> Result<f32, MsgPackError> {
        Ok(f32::from_bits(self.u32()?))
    }

    #[inline]
    fn f64(&mut self) -> Result<f64, MsgPackError> {
        Ok(f64::from_bits(self.u64()?))
    }

    #[inline]
    fn utf8(&mut self, size: usize) -> Result<String, MsgPackError> {
        self.check(size)?;
        let slice = &self.data[self.x..self.x + size];
        let s = std::str::from_utf8(slice)
            .map_err(|_| MsgPackError::InvalidUtf8)?
            .to_string();
        self.x += size;
        Ok(s)
    }

    #[inline]
    fn buf(&mut self, size: usize) -> Result<Vec<u8>, MsgPackError> {
        self.check(size)?;
        let v = self.data[self.x..self.x + size].to_vec();
        self.x += size;
        Ok(v)
    }

    pub fn read_any(&mut self) -> Result<Node, MsgPackError> {
        let byte = self.u8()?;

        // negative fixint: 0xe0..0xff
        if byte >= 0xe0 {
            return Ok(Node::Int(byte as i8 as i64));
        }
        // positive fixint: 0x00..0x7f
        if byte <= 0x7f {
            return Ok(Node::Int(byte as i64));
        }
        // fixmap: 0x80..0x8f
        if (0x80..=0x8f).contains(&byte) {
            return self.read_map(byte as usize & 0xf);
        }
        // fixarray: 0x90..0x9f
        if (0x90..=0x9f).contains(&byte) {
            return self.read_arr(byte as usize & 0xf);
        }
        // fixstr: 0xa0..0xbf
        if (0xa0..=0xbf).contains(&byte) {
            return self.utf8(byte as usize & 0x1f).map(Node::Str);
        }

        match byte {
            0xc0 => Ok(Node::Null),
            0xc2 => Ok(Node::Bool(false)),
            0xc3 => Ok(Node::Bool(true)),
            // bin8, bin16, bin32
            0xc4 => {
                let n = self.u8()? as usize;
                Ok(Node::Bytes(self.buf(n)?))
            }
            0xc5 => {
                let n = self.u16()? as usize;
                Ok(Node::Bytes(self.buf(n)?))
            }
            0xc6 => {
                let n = self.u32()? as usize;
                Ok(Node::Bytes(self.buf(n)?))
            }
            // float32, float64
            0xca => Ok(Node::Float(self.f32()? as f64)),
            0xcb => Ok(Node::Float(self.f64()?)),
            // uint8, uint16, uint32, uint64
            0xcc => Ok(Node::Int(self.u8()? as i64)),
            0xcd => Ok(Node::Int(self.u16()? as i64)),
            0xce => Ok(Node::Int(self.u32()? as i64)),
            0xcf => {
                let u = self.u64()?;
                i64::try_from(u)
                    .map(Node::Int)
                    .map_err(|_| MsgPackError::IntOutOfRange(u))
            }
            // int8, int16, int32, int64
            0xd0 => Ok(Node::Int(self.i8()? as i64)),
            0xd1 => Ok(Node::Int(self.i16()? as i64)),
            0xd2 => Ok(Node::Int(self.i32()? as i64)),
            0xd3 => Ok(Node::Int(self.i64()?)),
            // str8, str16, str32
            0xd9 => {
                let n = self.u8()? as usize;
                self.utf8(n).map(Node::Str)
            }
            0xda => {
                let n = self.u16()? as usize;
                self.utf8(n).map(Node::Str)
            }
            0xdb => {
                let n = self.u32()? as usize;
                self.utf8(n).map(Node::Str)
            }
            // array16, array32
            0xdc => {
                let n = self.u16()? as usize;
                self.read_arr(n)
            }
            0xdd => {
                let n = self.u32()? as usize;
                self.read_arr(n)
            }
            // map16, map32
            0xde => {
                let n = self.u16()? as usize;
                self.read_map(n)
            }
            0xdf => {
                let n = self.u32()? as usize;
                self.read_map(n)
            }
            // ext family and 0xc1 are not part of this wire format
            0xc1 | 0xc7..=0xc9 | 0xd4..=0xd8 => Err(MsgPackError::UnsupportedMarker(byte)),
            _ => Err(MsgPackError::InvalidByte(self.x - 1)),
        }
    }

    fn read_arr(&mut self, size: usize) -> Result<Node, MsgPackError> {
        let mut items = Vec::with_capacity(size.min(4096));
        for _ in 0..size {
            items.push(self.read_any()?);
        }
        Ok(Node::Array(items))
    }

    fn read_map(&mut self, size: usize) -> Result<Node, MsgPackError> {
        let mut pairs = Vec::with_capacity(size.min(4096));
        for _ in 0..size {
            let key = self.read_any()?;
            let val = self.read_any()?;
            pairs.push((key, val));
        }
        Ok(Node::Map(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Node, MsgPackError> {
        MsgPackDecoder::new().decode(bytes)
    }

    #[test]
    fn scalars() {
        assert_eq!(decode(&[0xc0]).unwrap(), Node::Null);
        assert_eq!(decode(&[0x05]).unwrap(), Node::Int(5));
        assert_eq!(decode(&[0xff]).unwrap(), Node::Int(-1));
        assert_eq!(decode(&[0xcc, 200]).unwrap(), Node::Int(200));
        assert_eq!(
            decode(&[0xcb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]).unwrap(),
            Node::Float(1.5)
        );
    }

    #[test]
    fn float32_widens() {
        assert_eq!(decode(&[0xca, 0x3f, 0xc0, 0, 0]).unwrap(), Node::Float(1.5));
    }

    #[test]
    fn uint64_above_i64_is_an_error() {
        let mut bytes = vec![0xcf];
        bytes.extend_from_slice(&u64::MAX.to_be_bytes());
        assert_eq!(
            decode(&bytes).unwrap_err(),
            MsgPackError::IntOutOfRange(u64::MAX)
        );
    }

    #[test]
    fn strings_arrays_maps() {
        assert_eq!(
            decode(&[0xa2, b'h', b'i']).unwrap(),
            Node::Str("hi".into())
        );
        assert_eq!(
            decode(&[0x92, 0x01, 0x02]).unwrap(),
            Node::Array(vec![Node::Int(1), Node::Int(2)])
        );
        assert_eq!(
            decode(&[0x81, 0xa1, b'a', 0x01]).unwrap(),
            Node::Map(vec![(Node::Str("a".into()), Node::Int(1))])
        );
    }

    #[test]
    fn non_string_map_keys() {
        assert_eq!(
            decode(&[0x81, 0x07, 0xc3]).unwrap(),
            Node::Map(vec![(Node::Int(7), Node::Bool(true))])
        );
    }

    #[test]
    fn ext_markers_rejected() {
        assert_eq!(
            decode(&[0xd4, 0x01, 0x00]).unwrap_err(),
            MsgPackError::UnsupportedMarker(0xd4)
        );
    }

    #[test]
    fn truncated_input_is_eof() {
        assert_eq!(decode(&[0x92, 0x01]).unwrap_err(), MsgPackError::UnexpectedEof);
        assert_eq!(decode(&[]).unwrap_err(), MsgPackError::UnexpectedEof);
    }
}
