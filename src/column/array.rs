use bytes::BufMut;

use crate::column::decode;
use crate::column::wire::{byte_len, take};
use crate::column::{Column, ReadAll};
use crate::core::CodecError;

/// `Array(T)`: cumulative row offsets over a flat child column.
///
/// Wire format:
/// ```text
/// [offsets: u64 * rows]        // cumulative, little-endian
/// [inner: T * offsets[rows-1]]
/// ```
pub struct Array<C: Column> {
    inner: C,
    offsets: Vec<u64>,
}

impl<C: Column> Array<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            offsets: Vec::new(),
        }
    }

    /// Declare that the next `len` rows appended to the child form one row.
    pub fn append_len(&mut self, len: usize) {
        let next = self.last_offset() + len as u64;
        self.offsets.push(next);
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The caller appends exactly the lengths declared with [`Array::append_len`].
    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Cumulative offsets of the current block.
    pub fn offsets(&self) -> &[u64] {
        &self.offsets
    }

    fn last_offset(&self) -> u64 {
        self.offsets.last().copied().unwrap_or(0)
    }
}

/// Per-row lengths, by successive difference of the offsets.
impl<C: Column> ReadAll<usize> for Array<C> {
    fn read_all(&self, out: &mut Vec<usize>) {
        out.reserve(self.offsets.len());
        let mut prev = 0u64;
        for &offset in &self.offsets {
            out.push((offset - prev) as usize);
            prev = offset;
        }
    }
}

impl<C: Column> Column for Array<C> {
    fn type_name(&self) -> String {
        format!("Array({})", self.inner.type_name())
    }

    fn rows(&self) -> usize {
        self.offsets.len()
    }

    fn reset(&mut self) {
        self.offsets.clear();
        self.inner.reset();
    }

    fn write_prefix(&self, buf: &mut Vec<u8>) {
        self.inner.write_prefix(buf);
    }

    fn write(&self, buf: &mut Vec<u8>) {
        debug_assert_eq!(
            self.last_offset() as usize,
            self.inner.rows(),
            "array offsets disagree with child rows"
        );
        buf.reserve(self.offsets.len() * 8);
        for &offset in &self.offsets {
            buf.put_u64_le(offset);
        }
        self.inner.write(buf);
    }

    fn read_prefix(&mut self, buf: &mut &[u8]) -> Result<(), CodecError> {
        self.inner.read_prefix(buf)
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        self.offsets.clear();
        let len = byte_len(rows, 8, "array offsets")?;
        decode::decode(take(buf, len, "array offsets")?, &mut self.offsets);

        let mut prev = 0u64;
        for (row, &offset) in self.offsets.iter().enumerate() {
            if offset < prev {
                return Err(CodecError::CorruptOffsets(format!(
                    "offset {offset} at row {row} is below previous offset {prev}"
                )));
            }
            prev = offset;
        }
        let child_rows = usize::try_from(prev).map_err(|_| {
            CodecError::CorruptOffsets(format!("final offset {prev} exceeds address space"))
        })?;
        self.inner.read(buf, child_rows)
    }
}
