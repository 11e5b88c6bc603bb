use std::io::Write;

use bytes::BufMut;
use log::debug;

use crate::column::Column;
use crate::core::CodecError;

use super::format::{put_string, put_varint};

/// Serializes columns into a sequence of Native blocks held in memory.
///
/// Each block is `[num_columns varint][num_rows varint]` followed by, per
/// column, `[name string][type string][prefix][body]`.
#[derive(Default)]
pub struct BlockWriter {
    buf: Vec<u8>,
    pending: Vec<u8>,
    pending_columns: usize,
    pending_rows: usize,
    blocks: usize,
}

impl BlockWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize `column` into the block under construction, then reset it
    /// for the next block. Every column of a block must have the same rows.
    pub fn add_column(&mut self, name: &str, column: &mut dyn Column) -> Result<(), CodecError> {
        let rows = column.rows();
        if self.pending_columns > 0 && rows != self.pending_rows {
            return Err(CodecError::BlockError(format!(
                "column '{name}' has {rows} rows, block has {}",
                self.pending_rows
            )));
        }
        put_string(&mut self.pending, name);
        put_string(&mut self.pending, &column.type_name());
        column.write_prefix(&mut self.pending);
        column.write(&mut self.pending);
        column.reset();

        self.pending_rows = rows;
        self.pending_columns += 1;
        Ok(())
    }

    /// Close the block under construction and append it to the output.
    pub fn finish_block(&mut self) {
        put_varint(&mut self.buf, self.pending_columns as u64);
        put_varint(&mut self.buf, self.pending_rows as u64);
        self.buf.put_slice(&self.pending);
        debug!(
            "Finished block {}: {} columns, {} rows, {} bytes",
            self.blocks,
            self.pending_columns,
            self.pending_rows,
            self.pending.len()
        );

        self.pending.clear();
        self.pending_columns = 0;
        self.pending_rows = 0;
        self.blocks += 1;
    }

    /// Serialize `columns` in order as one block. Nothing is written when
    /// the columns disagree on their row count.
    pub fn insert(&mut self, columns: &mut [(&str, &mut dyn Column)]) -> Result<(), CodecError> {
        if let Some((_, first)) = columns.first() {
            let rows = first.rows();
            if let Some((name, col)) = columns.iter().find(|(_, col)| col.rows() != rows) {
                return Err(CodecError::BlockError(format!(
                    "column '{name}' has {} rows, block has {rows}",
                    col.rows()
                )));
            }
        }
        for (name, column) in columns.iter_mut() {
            self.add_column(name, &mut **column)?;
        }
        self.finish_block();
        Ok(())
    }

    /// Number of finished blocks.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Copy the finished blocks to any `Write` destination.
    pub fn write_to(&self, w: &mut impl Write) -> Result<(), CodecError> {
        w.write_all(&self.buf)?;
        Ok(())
    }
}
