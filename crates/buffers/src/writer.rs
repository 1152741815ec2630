//! Growable binary writer with big-endian integer framing.

/// A byte buffer writer used by the format adapters.
///
/// Multi-byte integers are written big-endian, which is what both the
/// MessagePack framing and UTF-8 JSON output need.
///
/// # Example
///
/// ```
/// use transit_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the written bytes and resets the writer for reuse.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.buf.push(val as u8);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian u16.
    pub fn u8u16(&mut self, marker: u8, val: u16) {
        self.buf.push(marker);
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian u32.
    pub fn u8u32(&mut self, marker: u8, val: u32) {
        self.buf.push(marker);
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian u64.
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.buf.push(marker);
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian f64.
    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.buf.push(marker);
        self.buf.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a raw byte slice.
    pub fn buf(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes a UTF-8 string. Returns the number of bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf.extend_from_slice(s.as_bytes());
        s.len()
    }

    /// Writes an ASCII string.
    pub fn ascii(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_u16_big_endian() {
        let mut writer = Writer::new();
        writer.u16(0x0102);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_u8u32() {
        let mut writer = Writer::new();
        writer.u8u32(0xce, 0x01020304);
        assert_eq!(writer.flush(), [0xce, 0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_f64_roundtrip() {
        let mut writer = Writer::new();
        writer.f64(1.5);
        let data = writer.flush();
        assert_eq!(f64::from_be_bytes(data.try_into().unwrap()), 1.5);
    }

    #[test]
    fn test_utf8() {
        let mut writer = Writer::new();
        let n = writer.utf8("café");
        let data = writer.flush();
        assert_eq!(n, data.len());
        assert_eq!(std::str::from_utf8(&data).unwrap(), "café");
    }

    #[test]
    fn test_flush_resets() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        assert_eq!(writer.flush(), [0x01]);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x02]);
    }
}
