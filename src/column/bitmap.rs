use crate::column::wire::take;
use crate::core::CodecError;

/// Per-row null flags, one byte per row: `1` = null, `0` = present.
#[derive(Debug, Default)]
pub(super) struct NullMap {
    data: Vec<u8>,
}

impl NullMap {
    pub fn push(&mut self, is_null: bool) {
        self.data.push(is_null as u8);
    }

    pub fn is_null(&self, idx: usize) -> bool {
        self.data.get(idx).is_some_and(|&b| b != 0)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Replace the map with `rows` flags taken from the front of `buf`.
    /// Any non-zero byte reads as null.
    pub fn parse(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        self.data.clear();
        self.data.extend_from_slice(take(buf, rows, "null map")?);
        Ok(())
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.data);
    }
}
