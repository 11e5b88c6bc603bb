use log::{debug, trace};

use crate::column::Column;
use crate::conf::CodecConfig;
use crate::core::CodecError;

use super::format::{read_string, read_varint};

#[derive(Debug, Clone, Copy)]
struct BlockHeader {
    columns: usize,
    rows: usize,
    consumed: usize,
}

/// Reads Native blocks from a borrowed buffer, one column at a time.
///
/// Columns are decoded in the order the block declares them. The first
/// failure is kept: afterwards [`SelectCursor::next_block`] returns false and
/// [`SelectCursor::err`] reports it.
pub struct SelectCursor<'a> {
    buf: &'a [u8],
    strict_types: bool,
    block: Option<BlockHeader>,
    blocks: usize,
    err: Option<CodecError>,
}

impl<'a> SelectCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_config(buf, &CodecConfig::default())
    }

    pub fn with_config(buf: &'a [u8], config: &CodecConfig) -> Self {
        Self {
            buf,
            strict_types: config.strict_types,
            block: None,
            blocks: 0,
            err: None,
        }
    }

    /// Advance to the next block. Returns false at the end of the buffer or
    /// after any failure.
    pub fn next_block(&mut self) -> bool {
        if self.err.is_some() {
            return false;
        }
        if let Some(block) = self.block {
            if block.consumed < block.columns {
                self.fail(CodecError::BlockError(format!(
                    "block {} has {} unread columns",
                    self.blocks - 1,
                    block.columns - block.consumed
                )));
                return false;
            }
        }
        if self.buf.is_empty() {
            self.block = None;
            return false;
        }
        match self.read_header() {
            Ok(header) => {
                debug!(
                    "Reading block {}: {} columns, {} rows",
                    self.blocks, header.columns, header.rows
                );
                self.block = Some(header);
                self.blocks += 1;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Row count of the current block.
    pub fn rows(&self) -> usize {
        self.block.map_or(0, |b| b.rows)
    }

    /// Number of columns declared by the current block.
    pub fn columns(&self) -> usize {
        self.block.map_or(0, |b| b.columns)
    }

    /// Name and type of the next column without consuming it.
    pub fn peek_column(&self) -> Result<(&'a str, &'a str), CodecError> {
        self.remaining_columns()?;
        let mut buf = self.buf;
        let name = read_string(&mut buf, "column name")?;
        let type_name = read_string(&mut buf, "column type")?;
        Ok((name, type_name))
    }

    /// Decode the next column of the current block into `column`.
    pub fn next_column(&mut self, column: &mut dyn Column) -> Result<(), CodecError> {
        let result = self.decode_column(column);
        if let Err(e) = &result {
            self.fail(e.clone());
        }
        result
    }

    /// Decode the next `columns.len()` columns, in order.
    pub fn read_columns(&mut self, columns: &mut [&mut dyn Column]) -> Result<(), CodecError> {
        for column in columns.iter_mut() {
            self.next_column(&mut **column)?;
        }
        Ok(())
    }

    /// The first failure seen by this cursor.
    pub fn err(&self) -> Option<&CodecError> {
        self.err.as_ref()
    }

    fn read_header(&mut self) -> Result<BlockHeader, CodecError> {
        let columns = read_varint(&mut self.buf, "block column count")?;
        let rows = read_varint(&mut self.buf, "block row count")?;
        let to_usize = |v: u64, what: &str| {
            usize::try_from(v)
                .map_err(|_| CodecError::BlockError(format!("block {what} {v} too large")))
        };
        Ok(BlockHeader {
            columns: to_usize(columns, "column count")?,
            rows: to_usize(rows, "row count")?,
            consumed: 0,
        })
    }

    fn remaining_columns(&self) -> Result<usize, CodecError> {
        let block = self
            .block
            .ok_or_else(|| CodecError::BlockError("no current block".into()))?;
        if block.consumed >= block.columns {
            return Err(CodecError::BlockError(format!(
                "all {} columns of the block are consumed",
                block.columns
            )));
        }
        Ok(block.columns - block.consumed)
    }

    fn decode_column(&mut self, column: &mut dyn Column) -> Result<(), CodecError> {
        if let Some(e) = &self.err {
            return Err(e.clone());
        }
        self.remaining_columns()?;
        let name = read_string(&mut self.buf, "column name")?;
        let type_name = read_string(&mut self.buf, "column type")?;
        let column_type = column.type_name();
        if self.strict_types && column_type != type_name {
            return Err(CodecError::TypeMismatch {
                column: name.to_string(),
                block: type_name.to_string(),
                column_type,
            });
        }

        let rows = self.rows();
        column.read_prefix(&mut self.buf)?;
        column.read(&mut self.buf, rows)?;
        trace!("Decoded column '{}' ({}), {} rows", name, type_name, rows);

        if let Some(block) = self.block.as_mut() {
            block.consumed += 1;
        }
        Ok(())
    }

    fn fail(&mut self, e: CodecError) {
        if self.err.is_none() {
            debug!("Select cursor failed: {}", e);
            self.err = Some(e);
        }
    }
}
