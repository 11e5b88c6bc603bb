//! Columns whose composition is only known at runtime, from a block header.

use serde_json::Value;

use crate::column::{
    Array, Column, FixedColumn, FixedString, Leaf, LowCardinality, Nullable, ReadAll,
};
use crate::core::CodecError;
use crate::types::{ColumnType, PrimitiveType};

/// Any fixed-width leaf column.
pub enum DynLeaf {
    UInt8(FixedColumn<u8>),
    UInt16(FixedColumn<u16>),
    UInt32(FixedColumn<u32>),
    UInt64(FixedColumn<u64>),
    Int8(FixedColumn<i8>),
    Int16(FixedColumn<i16>),
    Int32(FixedColumn<i32>),
    Int64(FixedColumn<i64>),
    Float32(FixedColumn<f32>),
    Float64(FixedColumn<f64>),
    FixedString(FixedString),
}

macro_rules! dispatch {
    ($leaf:expr, $col:ident => $body:expr) => {
        match $leaf {
            DynLeaf::UInt8($col) => $body,
            DynLeaf::UInt16($col) => $body,
            DynLeaf::UInt32($col) => $body,
            DynLeaf::UInt64($col) => $body,
            DynLeaf::Int8($col) => $body,
            DynLeaf::Int16($col) => $body,
            DynLeaf::Int32($col) => $body,
            DynLeaf::Int64($col) => $body,
            DynLeaf::Float32($col) => $body,
            DynLeaf::Float64($col) => $body,
            DynLeaf::FixedString($col) => $body,
        }
    };
}

impl DynLeaf {
    pub fn new(ty: &ColumnType) -> Result<Self, CodecError> {
        let leaf = match ty {
            ColumnType::Primitive(p) => match p {
                PrimitiveType::UInt8 => DynLeaf::UInt8(FixedColumn::new()),
                PrimitiveType::UInt16 => DynLeaf::UInt16(FixedColumn::new()),
                PrimitiveType::UInt32 => DynLeaf::UInt32(FixedColumn::new()),
                PrimitiveType::UInt64 => DynLeaf::UInt64(FixedColumn::new()),
                PrimitiveType::Int8 => DynLeaf::Int8(FixedColumn::new()),
                PrimitiveType::Int16 => DynLeaf::Int16(FixedColumn::new()),
                PrimitiveType::Int32 => DynLeaf::Int32(FixedColumn::new()),
                PrimitiveType::Int64 => DynLeaf::Int64(FixedColumn::new()),
                PrimitiveType::Float32 => DynLeaf::Float32(FixedColumn::new()),
                PrimitiveType::Float64 => DynLeaf::Float64(FixedColumn::new()),
            },
            ColumnType::FixedString(width) => DynLeaf::FixedString(FixedString::new(*width)),
            other => {
                return Err(CodecError::UnknownType(format!(
                    "{other} is not a leaf type"
                )));
            }
        };
        Ok(leaf)
    }

    /// JSON rendering of `row`. FixedString values lose their zero padding.
    pub fn value_json(&self, row: usize) -> Value {
        match self {
            DynLeaf::UInt8(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::UInt16(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::UInt32(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::UInt64(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::Int8(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::Int16(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::Int32(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::Int64(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::Float32(c) => c.value(row).map_or(Value::Null, |v| Value::from(v as f64)),
            DynLeaf::Float64(c) => c.value(row).map_or(Value::Null, Value::from),
            DynLeaf::FixedString(c) => c.value(row).map_or(Value::Null, |bytes| {
                let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                Value::from(String::from_utf8_lossy(&bytes[..end]).into_owned())
            }),
        }
    }
}

impl Column for DynLeaf {
    fn type_name(&self) -> String {
        dispatch!(self, c => c.type_name())
    }

    fn rows(&self) -> usize {
        dispatch!(self, c => c.rows())
    }

    fn reset(&mut self) {
        dispatch!(self, c => c.reset())
    }

    fn write(&self, buf: &mut Vec<u8>) {
        dispatch!(self, c => c.write(buf))
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        dispatch!(self, c => c.read(buf, rows))
    }
}

impl Leaf for DynLeaf {
    fn element_size(&self) -> usize {
        dispatch!(self, c => c.element_size())
    }

    fn as_bytes(&self) -> &[u8] {
        dispatch!(self, c => c.as_bytes())
    }

    fn push_default(&mut self) {
        dispatch!(self, c => c.push_default())
    }

    fn truncate(&mut self, rows: usize) {
        dispatch!(self, c => c.truncate(rows))
    }
}

/// Any supported column composition.
pub enum DynColumn {
    Leaf(DynLeaf),
    Nullable(Nullable<DynLeaf>),
    LowCardinality(LowCardinality<DynLeaf>),
    Array(Box<Array<DynColumn>>),
}

impl DynColumn {
    pub fn new(ty: &ColumnType) -> Result<Self, CodecError> {
        let col = match ty {
            ColumnType::Primitive(_) | ColumnType::FixedString(_) => {
                DynColumn::Leaf(DynLeaf::new(ty)?)
            }
            ColumnType::Nullable(inner) => {
                DynColumn::Nullable(Nullable::new(DynLeaf::new(inner)?))
            }
            ColumnType::LowCardinality(inner) => match inner.as_ref() {
                ColumnType::Nullable(leaf) => {
                    DynColumn::LowCardinality(LowCardinality::nullable(DynLeaf::new(leaf)?))
                }
                leaf => DynColumn::LowCardinality(LowCardinality::new(DynLeaf::new(leaf)?)),
            },
            ColumnType::Array(inner) => {
                DynColumn::Array(Box::new(Array::new(DynColumn::new(inner)?)))
            }
        };
        Ok(col)
    }

    /// Every row of the current block as a JSON value; nulls become `null`
    /// and arrays become JSON arrays.
    pub fn values(&self) -> Vec<Value> {
        match self {
            DynColumn::Leaf(leaf) => (0..leaf.rows()).map(|row| leaf.value_json(row)).collect(),
            DynColumn::Nullable(col) => (0..col.rows())
                .map(|row| {
                    if col.is_null(row) {
                        Value::Null
                    } else {
                        col.inner().value_json(row)
                    }
                })
                .collect(),
            DynColumn::LowCardinality(col) => {
                let mut keys: Vec<usize> = Vec::with_capacity(col.rows());
                col.read_all(&mut keys);
                keys.into_iter()
                    .map(|key| {
                        if col.is_nullable() && key == 0 {
                            Value::Null
                        } else {
                            col.dictionary().value_json(key)
                        }
                    })
                    .collect()
            }
            DynColumn::Array(col) => {
                let mut lens: Vec<usize> = Vec::with_capacity(col.rows());
                col.read_all(&mut lens);
                let mut flat = col.inner().values().into_iter();
                lens.into_iter()
                    .map(|len| Value::Array(flat.by_ref().take(len).collect()))
                    .collect()
            }
        }
    }

    fn as_column(&self) -> &dyn Column {
        match self {
            DynColumn::Leaf(c) => c,
            DynColumn::Nullable(c) => c,
            DynColumn::LowCardinality(c) => c,
            DynColumn::Array(c) => c.as_ref(),
        }
    }

    fn as_column_mut(&mut self) -> &mut dyn Column {
        match self {
            DynColumn::Leaf(c) => c,
            DynColumn::Nullable(c) => c,
            DynColumn::LowCardinality(c) => c,
            DynColumn::Array(c) => c.as_mut(),
        }
    }
}

impl Column for DynColumn {
    fn type_name(&self) -> String {
        self.as_column().type_name()
    }

    fn rows(&self) -> usize {
        self.as_column().rows()
    }

    fn reset(&mut self) {
        self.as_column_mut().reset()
    }

    fn write_prefix(&self, buf: &mut Vec<u8>) {
        self.as_column().write_prefix(buf)
    }

    fn write(&self, buf: &mut Vec<u8>) {
        self.as_column().write(buf)
    }

    fn read_prefix(&mut self, buf: &mut &[u8]) -> Result<(), CodecError> {
        self.as_column_mut().read_prefix(buf)
    }

    fn read(&mut self, buf: &mut &[u8], rows: usize) -> Result<(), CodecError> {
        self.as_column_mut().read(buf, rows)
    }
}
