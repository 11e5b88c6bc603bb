//! `LowCardinality(T)`: block-local dictionary encoding.
//!
//! Wire format, per column per block:
//! ```text
//! prefix: [key_serialization_version: u64]          // always 1
//! body:   [flags: u64]                              // key type | additional keys | update dictionary
//!         [dictionary_size: u64]
//!         [dictionary: T * dictionary_size]         // plain T, never Nullable(T)
//!         [rows: u64]
//!         [keys: key_width * rows]
//! ```
//! A column with zero rows writes no body.
//!
//! Dictionary slot 0 always holds T's zero value and key 0 always means
//! null, so appended values start at index 1.

mod keys;

use ahash::AHashMap;
use bytes::BufMut;
use log::trace;

use crate::column::wire::{byte_len, read_u64, take};
use crate::column::{Append, Column, Leaf, ReadAll};
use crate::core::CodecError;

pub use keys::KeyWidth;
use keys::Keys;

/// Shared dictionaries with additional keys; the only version the server emits.
const KEYS_SERIALIZATION_VERSION: u64 = 1;

const KEY_TYPE_MASK: u64 = 0xff;
const NEED_GLOBAL_DICTIONARY: u64 = 1 << 8;
const HAS_ADDITIONAL_KEYS: u64 = 1 << 9;
const NEED_UPDATE_DICTIONARY: u64 = 1 << 10;

/// Key that marks a null row.
pub const NULL_KEY: usize = 0;

pub struct LowCardinality<C: Leaf> {
    dictionary: C,
    /// Encoded value bytes to dictionary index. Write side only.
    index: AHashMap<Vec<u8>, u64>,
    keys: Keys,
    nullable: bool,
    cursor: usize,
}

impl<C: Leaf> LowCardinality<C> {
    /// `LowCardinality(T)` over an empty dictionary column.
    pub fn new(dictionary: C) -> Self {
        Self::with_nullable(dictionary, false)
    }

    /// `LowCardinality(Nullable(T))`. The dictionary stays a plain `T`.
    pub fn nullable(dictionary: C) -> Self {
        Self::with_nullable(dictionary, true)
    }

    fn with_nullable(dictionary: C, nullable: bool) -> Self {
        let mut col = Self {
            dictionary,
            index: AHashMap::new(),
            keys: Keys::new(),
            nullable,
            cursor: 0,
        };
        col.reset();
        col
    }

    /// Dictionary values of the current block, slot 0 included.
    pub fn dictionary(&self) -> &C {
        &self.dictionary
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn key_width(&self) -> KeyWidth {
        self.keys.width()
    }

    /// Append a null row: key 0, dictionary unchanged.
    pub fn append_null(&mut self) {
        self.keys.push(NULL_KEY as u64);
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

    /// Advance the row cursor. Returns false once the block is exhausted.
    pub fn next(&mut self) -> bool {
        if self.cursor < self.keys.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Dictionary index of the row the last successful [`LowCardinality::next`]
    /// moved to.
    ///
    /// # Panics
    ///
    /// Panics if [`LowCardinality::next`] has not returned `true` since the
    /// last read or [`LowCardinality::rewind`].
    pub fn value(&self) -> usize {
        assert!(self.cursor > 0, "value() called before next()");
        self.keys.get(self.cursor - 1) as usize
    }

    /// Decode the next `dst.len()` keys into `dst` and advance the cursor
    /// past them.
    pub fn fill(&mut self, dst: &mut [usize]) -> Result<(), CodecError> {
        let remaining = self.keys.len() - self.cursor;
        if dst.len() > remaining {
            return Err(CodecError::CursorExhausted {
                requested: dst.len(),
                remaining,
            });
        }
        self.keys.fill(self.cursor, dst);
        let size = self.dictionary.rows();
        if let Some(&key) = dst.iter().find(|&&k| k >= size) {
            return Err(CodecError::KeyOutOfRange {
                key: key as u64,
                size,
            });
        }
        self.cursor += dst.len();
        Ok(())
    }

    /// Rewind the row cursor to the first row of the block.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Resolve the row just appended to the dictionary column: reuse an
    /// existing slot for a repeated value, otherwise keep it as a new one.
    fn intern_last(&mut self) {
        let row = self.dictionary.rows() - 1;
        let size = self.dictionary.element_size();
        let existing = self
            .index
            .get(&self.dictionary.as_bytes()[row * size..])
            .copied();
        let key = match existing {
            Some(key) => {
                self.dictionary.truncate(row);
                key
            }
            None => {
                let value = self.dictionary.as_bytes()[row * size..].to_vec();
                self.index.insert(value, row as u64);
                let width = KeyWidth::for_dictionary(row + 1);
                if width > self.keys.width() {
                    trace!(
                        "LowCardinality dictionary reached {} values, widening keys to {:?}",
                        row + 1,
                        width
                    );
                    self.keys.widen(width);
                }
                row as u64
            }
        };
        self.keys.push(key);
    }
}

impl<C: Leaf + Append<V>, V> Append<V> for LowCardinality<C> {
    fn append(&mut self, value: V) {
        self.dictionary.append(value);
        self.intern_last();
    }
}

/// Dictionary indexes of every row; 0 denotes null.
impl<C: Leaf> ReadAll<usize> for LowCardinality<C> {
    fn read_all(&self, out: &mut Vec<usize>) {
        self.keys.read_all(out);
    }
}

impl<C: Leaf> Column for LowCardinality<C> {
    fn type_name(&self) -> String {
        if self.nullable {
            format!("LowCardinality(Nullable({}))", self.dictionary.type_name())
        } else {
            format!("LowCardinality({})", self.dictionary.type_name())
        }
    }

    fn rows(&self) -> usize {
        self.keys.len()
    }

    fn reset(&mut self) {
        self.dictionary.reset();
        self.dictionary.push_default();
        self.index.clear();
        self.keys.clear();
        self.cursor = 0;
    }

    fn write_prefix(&self, buf: &mut Vec<u8>) {
        buf.put_u64_le(KEYS_SERIALIZATION_VERSION);
    }

    fn write(&self, buf: &mut Vec<u8>) {
        if self.keys.len() == 0 {
            return;
        }
        let width = self.keys.width();
        debug_assert!(width >= KeyWidth::for_dictionary(self.dictionary.rows()));
        buf.put_u64_le(width.type_code() | HAS_ADDITIONAL_KEYS | NEED_UPDATE_DICTIONARY);
        buf.put_u64_le(self.dictionary.rows() as u64);
        self.dictionary.write(buf);
        buf.put_u64_le(self.keys.len() as u64);
        buf.extend_from_slice(self.keys.as_bytes());
    }

    fn read_prefix(&mut self, buf: &mut &[u8]) -> Result<(), CodecError> {
        let version = read_u64(buf, "LowCardinality version")?;
        if version != KEYS_SERIALIZATION_VERSION {
            return Err(CodecError::LowCardinality(format!(
                "unsupported key serialization version {version}"
            )));
        }
        Ok(())
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        self.reset();
        if rows == 0 {
            return Ok(());
        }

        let flags = read_u64(buf, "LowCardinality flags")?;
        if flags & NEED_GLOBAL_DICTIONARY != 0 {
            return Err(CodecError::LowCardinality(
                "shared global dictionaries are not supported".into(),
            ));
        }
        if flags & HAS_ADDITIONAL_KEYS == 0 {
            return Err(CodecError::LowCardinality(
                "block carries no dictionary".into(),
            ));
        }
        let width = KeyWidth::from_type_code(flags & KEY_TYPE_MASK)?;

        let dictionary_size = read_u64(buf, "LowCardinality dictionary size")? as usize;
        self.dictionary.read(buf, dictionary_size)?;

        let key_rows = read_u64(buf, "LowCardinality rows")?;
        if key_rows != rows as u64 {
            return Err(CodecError::LowCardinality(format!(
                "block declares {rows} rows but LowCardinality carries {key_rows} keys"
            )));
        }
        let len = byte_len(rows, width.bytes(), "LowCardinality keys")?;
        self.keys.load(width, take(buf, len, "LowCardinality keys")?);

        if let Some(max) = self.keys.max() {
            if max >= dictionary_size as u64 {
                return Err(CodecError::KeyOutOfRange {
                    key: max,
                    size: dictionary_size,
                });
            }
        }
        Ok(())
    }
}
