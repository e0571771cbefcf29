//! Error types shared across the workspace

use crate::value::Value;

/// A concrete value could not be coerced into a logical type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Cannot convert {kind} value '{value}' to {target}: {reason}")]
pub struct TypeConversionError {
    /// Rendered source value
    pub value: String,

    /// Variant of the source value
    pub kind: &'static str,

    /// Name of the target type
    pub target: String,

    /// Why the conversion failed
    pub reason: String,
}

impl TypeConversionError {
    /// Create a conversion error for a value and target type name
    pub fn new(value: &Value, target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.to_string(),
            kind: value.kind(),
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while building or reading tables and datasets
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataSetError {
    #[error("Table not found: {0}")]
    NoSuchTable(String),

    #[error("Column '{column}' not found in table {table}")]
    NoSuchColumn { table: String, column: String },

    #[error("Row {row} out of bounds for table {table} ({row_count} rows)")]
    RowOutOfBounds {
        table: String,
        row: usize,
        row_count: usize,
    },

    #[error("Column index {column} out of bounds for table {table}")]
    ColumnOutOfBounds { table: String, column: usize },

    #[error("Table {table} expects {expected} values per row, got {actual}")]
    RowWidth {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate table name: {0}")]
    DuplicateTable(String),

    #[error("Cannot sort table {table}: {source}")]
    Sort {
        table: String,
        #[source]
        source: Box<TypeConversionError>,
    },
}
