use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("object contains no parameters")]
    NoParametersFound,
    #[error("shape mismatch: object holds {expected} parameters, got {found} replacements")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("`{0}` is a derived column and cannot be written")]
    ReservedKey(String),
    #[error("arity mismatch: expected {expected} values, got {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("key not found: `{0}`")]
    KeyNotFound(String),
    #[error("index {index} out of bounds for {len} parameters")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("a parameter needs a `value` field")]
    MissingValue,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid records: {0}")]
    InvalidRecords(String),
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
}
