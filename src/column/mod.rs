mod array;
mod bitmap;
pub mod decode;
mod fixed;
mod fixed_string;
mod low_cardinality;
mod nullable;
pub(crate) mod wire;

use crate::core::CodecError;

pub use array::Array;
pub use decode::Primitive;
pub use fixed::FixedColumn;
pub use fixed_string::FixedString;
pub use low_cardinality::{KeyWidth, LowCardinality, NULL_KEY};
pub use nullable::Nullable;

/// One column of one block, in the Native wire layout.
///
/// A column is filled by appends (write side) or by [`Column::read`] (read
/// side), serialized or drained, then [`Column::reset`] for the next block.
/// Wrappers own the column they wrap and delegate to it.
pub trait Column {
    /// Wire type name, e.g. `Array(LowCardinality(Nullable(Float32)))`.
    fn type_name(&self) -> String;

    /// Number of logical rows in the current block.
    fn rows(&self) -> usize;

    /// Truncate to zero rows, keeping allocated capacity.
    fn reset(&mut self);

    /// Serialize the per-column state prefix. Written once per column per
    /// block, before the body of any enclosing wrapper.
    fn write_prefix(&self, _buf: &mut Vec<u8>) {}

    /// Serialize the column body.
    fn write(&self, buf: &mut Vec<u8>);

    fn read_prefix(&mut self, _buf: &mut &[u8]) -> Result<(), CodecError> {
        Ok(())
    }

    /// Replace the column contents with `rows` rows decoded from the front
    /// of `buf`, advancing it past the consumed bytes.
    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError>;
}

/// A fixed-width column whose rows are contiguous `element_size()` byte runs.
///
/// Leaves are what Nullable and LowCardinality can wrap.
pub trait Leaf: Column {
    fn element_size(&self) -> usize;

    /// Raw little-endian row bytes.
    fn as_bytes(&self) -> &[u8];

    /// Append the type's zero value.
    fn push_default(&mut self);

    fn truncate(&mut self, rows: usize);
}

/// Append one logical value of type `V`.
pub trait Append<V> {
    fn append(&mut self, value: V);
}

/// Bulk decode of the current block into application values.
pub trait ReadAll<V> {
    /// Append every row of the current block to `out`, in row order.
    fn read_all(&self, out: &mut Vec<V>);
}

impl<C: Column + ?Sized> Column for Box<C> {
    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn rows(&self) -> usize {
        (**self).rows()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn write_prefix(&self, buf: &mut Vec<u8>) {
        (**self).write_prefix(buf)
    }

    fn write(&self, buf: &mut Vec<u8>) {
        (**self).write(buf)
    }

    fn read_prefix(&mut self, buf: &mut &[u8]) -> Result<(), CodecError> {
        (**self).read_prefix(buf)
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        (**self).read(buf, rows)
    }
}
