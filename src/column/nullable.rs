use crate::column::bitmap::NullMap;
use crate::column::{Append, Column, Leaf, ReadAll};
use crate::core::CodecError;

/// `Nullable(T)`: a leaf column plus a per-row null map.
///
/// Wire format:
/// ```text
/// [null_map: u8 * rows]   // 1 = null
/// [inner: T * rows]       // null rows hold T's zero value
/// ```
///
/// The inner column is only reachable read-only so that the null map and the
/// inner rows always advance together.
pub struct Nullable<C: Leaf> {
    inner: C,
    nulls: NullMap,
}

impl<C: Leaf> Nullable<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            nulls: NullMap::default(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Raw null map of the current block.
    pub fn nulls(&self) -> &[u8] {
        self.nulls.as_bytes()
    }

    pub fn is_null(&self, row: usize) -> bool {
        self.nulls.is_null(row)
    }

    /// Append a placeholder row flagged as null.
    pub fn append_null(&mut self) {
        self.inner.push_default();
        self.nulls.push(true);
    }

    pub fn append_option<V>(&mut self, value: Option<V>)
    where
        C: Append<V>,
    {
        match value {
            Some(v) => self.append(v),
            None => self.append_null(),
        }
    }

    /// Decode the block as options, mapping flagged rows to `None`.
    pub fn read_all_options<V>(&self, out: &mut Vec<Option<V>>)
    where
        C: ReadAll<V>,
    {
        let mut values: Vec<V> = Vec::with_capacity(self.rows());
        self.inner.read_all(&mut values);
        out.extend(
            values
                .into_iter()
                .enumerate()
                .map(|(row, v)| (!self.nulls.is_null(row)).then_some(v)),
        );
    }
}

impl<C: Leaf + Append<V>, V> Append<V> for Nullable<C> {
    fn append(&mut self, value: V) {
        self.inner.append(value);
        self.nulls.push(false);
    }
}

/// Raw inner values, placeholders included.
impl<C: Leaf + ReadAll<V>, V> ReadAll<V> for Nullable<C> {
    fn read_all(&self, out: &mut Vec<V>) {
        self.inner.read_all(out);
    }
}

impl<C: Leaf> Column for Nullable<C> {
    fn type_name(&self) -> String {
        format!("Nullable({})", self.inner.type_name())
    }

    fn rows(&self) -> usize {
        self.nulls.len()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.nulls.clear();
    }

    fn write_prefix(&self, buf: &mut Vec<u8>) {
        self.inner.write_prefix(buf);
    }

    fn write(&self, buf: &mut Vec<u8>) {
        debug_assert_eq!(self.nulls.len(), self.inner.rows());
        self.nulls.write(buf);
        self.inner.write(buf);
    }

    fn read_prefix(&mut self, buf: &mut &[u8]) -> Result<(), CodecError> {
        self.inner.read_prefix(buf)
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        self.nulls.parse(buf, rows)?;
        self.inner.read(buf, rows)
    }
}
