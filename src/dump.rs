use std::io::Write;

use log::debug;
use serde_json::{Map, Value};

use crate::block::SelectCursor;
use crate::conf::CodecConfig;
use crate::core::CodecError;
use crate::dynamic::DynColumn;
use crate::types::ColumnType;

/// Decode every block in `data` and write each row to `out` as one JSON
/// object per line, keyed by column name in block order. Returns the number
/// of rows written.
pub fn dump_blocks(
    data: &[u8],
    config: &CodecConfig,
    out: &mut impl Write,
) -> Result<usize, CodecError> {
    let mut cursor = SelectCursor::with_config(data, config);
    let mut total = 0;
    while cursor.next_block() {
        let mut columns: Vec<(String, Vec<Value>)> = Vec::with_capacity(cursor.columns());
        for _ in 0..cursor.columns() {
            let (name, type_name) = cursor.peek_column()?;
            let ty: ColumnType = type_name.parse()?;
            let mut column = DynColumn::new(&ty)?;
            cursor.next_column(&mut column)?;
            let values = column_values(name, &column, cursor.rows())?;
            columns.push((name.to_string(), values));
        }

        let rows = cursor.rows();
        for row in 0..rows {
            let object: Map<String, Value> = columns
                .iter()
                .map(|(name, values)| (name.clone(), values[row].clone()))
                .collect();
            serde_json::to_writer(&mut *out, &object)
                .map_err(|e| CodecError::IoError(e.to_string()))?;
            out.write_all(b"\n")?;
        }
        debug!("Dumped block of {} rows", rows);
        total += rows;
    }
    match cursor.err() {
        Some(e) => Err(e.clone()),
        None => Ok(total),
    }
}

/// Rendered rows of a decoded column, which must cover the whole block.
fn column_values(name: &str, column: &DynColumn, rows: usize) -> Result<Vec<Value>, CodecError> {
    let values = column.values();
    if values.len() != rows {
        return Err(CodecError::BlockError(format!(
            "column '{name}' decoded {} rows, block has {rows}",
            values.len()
        )));
    }
    Ok(values)
}
