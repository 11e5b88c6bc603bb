use std::marker::PhantomData;

use crate::column::decode::{self, Primitive};
use crate::column::wire::{byte_len, take};
use crate::column::{Append, Column, Leaf, ReadAll};
use crate::core::CodecError;

/// Fixed-width numeric column: `rows × size_of::<T>()` little-endian bytes.
pub struct FixedColumn<T: Primitive> {
    data: Vec<u8>,
    _marker: PhantomData<T>,
}

impl<T: Primitive> FixedColumn<T> {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn with_capacity(rows: usize) -> Self {
        Self {
            data: Vec::with_capacity(rows * std::mem::size_of::<T>()),
            _marker: PhantomData,
        }
    }

    /// A plain column has no null map: `None` stores the zero value.
    pub fn append_option(&mut self, value: Option<T>) {
        self.append(value.unwrap_or_default());
    }

    /// Value at `row`, or `None` past the end of the block.
    pub fn value(&self, row: usize) -> Option<T> {
        (row < self.rows()).then(|| decode::decode_at(&self.data, row))
    }
}

impl<T: Primitive> Default for FixedColumn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Primitive> Append<T> for FixedColumn<T> {
    fn append(&mut self, value: T) {
        value.put_le(&mut self.data);
    }
}

impl<T: Primitive> ReadAll<T> for FixedColumn<T> {
    fn read_all(&self, out: &mut Vec<T>) {
        decode::decode(&self.data, out);
    }
}

impl<T: Primitive> Column for FixedColumn<T> {
    fn type_name(&self) -> String {
        T::TYPE_NAME.to_string()
    }

    fn rows(&self) -> usize {
        self.data.len() / std::mem::size_of::<T>()
    }

    fn reset(&mut self) {
        self.data.clear();
    }

    fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.data);
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        self.data.clear();
        let len = byte_len(rows, std::mem::size_of::<T>(), T::TYPE_NAME)?;
        self.data.extend_from_slice(take(buf, len, T::TYPE_NAME)?);
        Ok(())
    }
}

impl<T: Primitive> Leaf for FixedColumn<T> {
    fn element_size(&self) -> usize {
        std::mem::size_of::<T>()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn push_default(&mut self) {
        T::default().put_le(&mut self.data);
    }

    fn truncate(&mut self, rows: usize) {
        self.data.truncate(rows * std::mem::size_of::<T>());
    }
}
