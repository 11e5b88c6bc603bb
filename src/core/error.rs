use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CodecError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Unexpected end of buffer reading {context}: need {needed} bytes, have {available}")]
    UnexpectedEof {
        context: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("Corrupt offset table: {0}")]
    CorruptOffsets(String),
    #[error("Dictionary key {key} out of range (dictionary has {size} values)")]
    KeyOutOfRange { key: u64, size: usize },
    #[error("LowCardinality error: {0}")]
    LowCardinality(String),
    #[error("Cursor exhausted: requested {requested} keys, {remaining} remaining")]
    CursorExhausted { requested: usize, remaining: usize },
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Type mismatch for column {column}: block has {block}, column is {column_type}")]
    TypeMismatch {
        column: String,
        block: String,
        column_type: String,
    },
    #[error("Block error: {0}")]
    BlockError(String),
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::IoError(err.to_string())
    }
}
