use crate::column::wire::{byte_len, take};
use crate::column::{Append, Column, Leaf, ReadAll};
use crate::core::CodecError;

/// `FixedString(N)`: every row is exactly `width` raw bytes, no length prefix.
pub struct FixedString {
    width: usize,
    data: Vec<u8>,
}

impl FixedString {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `None` stores a row of zero bytes.
    pub fn append_option<V>(&mut self, value: Option<V>)
    where
        Self: Append<V>,
    {
        match value {
            Some(v) => self.append(v),
            None => self.push_default(),
        }
    }

    /// Bytes of `row`, including any zero padding.
    pub fn value(&self, row: usize) -> Option<&[u8]> {
        if row >= self.rows() {
            return None;
        }
        Some(&self.data[row * self.width..(row + 1) * self.width])
    }
}

/// Values longer than the width are truncated, shorter ones zero-padded.
impl<'a> Append<&'a [u8]> for FixedString {
    fn append(&mut self, value: &'a [u8]) {
        let n = value.len().min(self.width);
        self.data.extend_from_slice(&value[..n]);
        self.data.resize(self.data.len() + self.width - n, 0);
    }
}

impl<'a> Append<&'a str> for FixedString {
    fn append(&mut self, value: &'a str) {
        self.append(value.as_bytes());
    }
}

impl Append<Vec<u8>> for FixedString {
    fn append(&mut self, value: Vec<u8>) {
        self.append(value.as_slice());
    }
}

impl ReadAll<Vec<u8>> for FixedString {
    fn read_all(&self, out: &mut Vec<Vec<u8>>) {
        if self.width == 0 {
            return;
        }
        out.extend(self.data.chunks_exact(self.width).map(<[u8]>::to_vec));
    }
}

impl Column for FixedString {
    fn type_name(&self) -> String {
        format!("FixedString({})", self.width)
    }

    fn rows(&self) -> usize {
        if self.width == 0 {
            return 0;
        }
        self.data.len() / self.width
    }

    fn reset(&mut self) {
        self.data.clear();
    }

    fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.data);
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        self.data.clear();
        let len = byte_len(rows, self.width, "FixedString")?;
        self.data.extend_from_slice(take(buf, len, "FixedString")?);
        Ok(())
    }
}

impl Leaf for FixedString {
    fn element_size(&self) -> usize {
        self.width
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn push_default(&mut self) {
        self.data.resize(self.data.len() + self.width, 0);
    }

    fn truncate(&mut self, rows: usize) {
        self.data.truncate(rows * self.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_and_truncate() {
        let mut col = FixedString::new(4);
        col.append("ab");
        col.append("abcdef");
        assert_eq!(col.rows(), 2);
        assert_eq!(col.value(0), Some(&b"ab\0\0"[..]));
        assert_eq!(col.value(1), Some(&b"abcd"[..]));
        assert_eq!(col.value(2), None);
    }

    #[test]
    fn test_wire_layout() {
        let mut col = FixedString::new(10);
        col.append(format!("{:10}", 1).as_bytes());
        let mut buf = Vec::new();
        col.write(&mut buf);
        assert_eq!(buf, b"         1");
    }

    #[test]
    fn test_round_trip() {
        let mut col = FixedString::new(10);
        let inserted: Vec<Vec<u8>> = (1..=10)
            .map(|i| format!("{:10}", i).into_bytes())
            .collect();
        for v in &inserted {
            col.append(v.as_slice());
        }
        let mut buf = Vec::new();
        col.write(&mut buf);

        let mut read = FixedString::new(10);
        read.read(&mut &buf[..], 10).unwrap();
        let mut values: Vec<Vec<u8>> = Vec::new();
        read.read_all(&mut values);
        assert_eq!(values, inserted);
    }

    #[test]
    fn test_read_short_buffer() {
        let mut col = FixedString::new(10);
        let err = col.read(&mut &b"12345"[..], 1).unwrap_err();
        assert!(err.to_string().contains("FixedString"));
    }

    #[test]
    fn test_append_option() {
        let mut col = FixedString::new(2);
        col.append_option(Some("xy"));
        col.append_option(None::<&str>);
        assert_eq!(col.as_bytes(), b"xy\0\0");
    }

    #[test]
    fn test_push_default_is_zeroed() {
        let mut col = FixedString::new(3);
        col.push_default();
        assert_eq!(col.as_bytes(), &[0, 0, 0]);
        assert_eq!(col.type_name(), "FixedString(3)");
    }
}
