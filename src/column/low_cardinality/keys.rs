use crate::column::decode::{self, Primitive};
use crate::core::CodecError;

/// Byte width of each dictionary key in a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyWidth {
    U8,
    U16,
    U32,
    U64,
}

impl KeyWidth {
    pub fn bytes(self) -> usize {
        match self {
            KeyWidth::U8 => 1,
            KeyWidth::U16 => 2,
            KeyWidth::U32 => 4,
            KeyWidth::U64 => 8,
        }
    }

    /// Largest key this width can hold.
    pub fn max_key(self) -> u64 {
        match self {
            KeyWidth::U8 => u8::MAX as u64,
            KeyWidth::U16 => u16::MAX as u64,
            KeyWidth::U32 => u32::MAX as u64,
            KeyWidth::U64 => u64::MAX,
        }
    }

    /// Narrowest width addressing every index of a dictionary of `size` values.
    pub fn for_dictionary(size: usize) -> KeyWidth {
        let max_index = size.saturating_sub(1) as u64;
        [KeyWidth::U8, KeyWidth::U16, KeyWidth::U32]
            .into_iter()
            .find(|w| max_index <= w.max_key())
            .unwrap_or(KeyWidth::U64)
    }

    /// Key type code carried in the low byte of the serialization flags.
    pub(super) fn type_code(self) -> u64 {
        match self {
            KeyWidth::U8 => 0,
            KeyWidth::U16 => 1,
            KeyWidth::U32 => 2,
            KeyWidth::U64 => 3,
        }
    }

    pub(super) fn from_type_code(code: u64) -> Result<KeyWidth, CodecError> {
        match code {
            0 => Ok(KeyWidth::U8),
            1 => Ok(KeyWidth::U16),
            2 => Ok(KeyWidth::U32),
            3 => Ok(KeyWidth::U64),
            other => Err(CodecError::LowCardinality(format!(
                "unknown key type code {other}"
            ))),
        }
    }
}

/// Packed little-endian key sequence sharing one width.
#[derive(Debug)]
pub(super) struct Keys {
    width: KeyWidth,
    data: Vec<u8>,
}

impl Keys {
    pub fn new() -> Self {
        Self {
            width: KeyWidth::U8,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> KeyWidth {
        self.width
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.width.bytes()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Drop all keys and fall back to the narrowest width.
    pub fn clear(&mut self) {
        self.data.clear();
        self.width = KeyWidth::U8;
    }

    /// Append `key`, which must fit the current width.
    pub fn push(&mut self, key: u64) {
        debug_assert!(key <= self.width.max_key());
        match self.width {
            KeyWidth::U8 => (key as u8).put_le(&mut self.data),
            KeyWidth::U16 => (key as u16).put_le(&mut self.data),
            KeyWidth::U32 => (key as u32).put_le(&mut self.data),
            KeyWidth::U64 => key.put_le(&mut self.data),
        }
    }

    /// Re-encode every key at `width`. Narrowing is ignored.
    pub fn widen(&mut self, width: KeyWidth) {
        if width <= self.width {
            return;
        }
        let mut keys = Vec::with_capacity(self.len());
        self.read_all(&mut keys);
        self.data.clear();
        self.data.reserve(keys.len() * width.bytes());
        self.width = width;
        for key in keys {
            self.push(key as u64);
        }
    }

    pub fn get(&self, row: usize) -> u64 {
        match self.width {
            KeyWidth::U8 => self.data[row] as u64,
            KeyWidth::U16 => decode::decode_at::<u16>(&self.data, row) as u64,
            KeyWidth::U32 => decode::decode_at::<u32>(&self.data, row) as u64,
            KeyWidth::U64 => decode::decode_at::<u64>(&self.data, row),
        }
    }

    /// Replace the keys with raw `bytes` packed at `width`.
    pub fn load(&mut self, width: KeyWidth, bytes: &[u8]) {
        self.width = width;
        self.data.clear();
        self.data.extend_from_slice(bytes);
    }

    /// Largest key in the sequence, if any.
    pub fn max(&self) -> Option<u64> {
        (0..self.len()).map(|row| self.get(row)).max()
    }

    pub fn read_all(&self, out: &mut Vec<usize>) {
        match self.width {
            KeyWidth::U8 => out.extend(self.data.iter().map(|&k| k as usize)),
            KeyWidth::U16 => extend_keys::<u16>(&self.data, out),
            KeyWidth::U32 => extend_keys::<u32>(&self.data, out),
            KeyWidth::U64 => extend_keys::<u64>(&self.data, out),
        }
    }

    /// Decode `dst.len()` keys starting at `start`.
    pub fn fill(&self, start: usize, dst: &mut [usize]) {
        for (i, slot) in dst.iter_mut().enumerate() {
            *slot = self.get(start + i) as usize;
        }
    }
}

fn extend_keys<T: Primitive + Into<u64>>(raw: &[u8], out: &mut Vec<usize>) {
    let mut keys: Vec<T> = Vec::with_capacity(raw.len() / std::mem::size_of::<T>());
    decode::decode(raw, &mut keys);
    out.extend(keys.into_iter().map(|k| k.into() as usize));
}
