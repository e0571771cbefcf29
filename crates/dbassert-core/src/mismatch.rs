//! Mismatch entries produced by dataset comparison
//!
//! Mismatch codes are stable strings that reporting adapters may match on.
//! Never rename a code; add new ones instead.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Stable mismatch code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MismatchCode {
    /// Expected table absent from the actual dataset
    MissingTable,

    /// Expected column absent from the actual table
    MissingColumn,

    /// Expected and actual tables have different row counts
    RowCountMismatch,

    /// Actual table not mentioned in expected (strict mode only)
    UnexpectedTable,

    /// Actual column not mentioned in expected (strict mode only)
    UnexpectedColumn,

    /// Two cells differ
    CellValueMismatch,
}

impl MismatchCode {
    /// Get the code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingTable => "MISSING_TABLE",
            Self::MissingColumn => "MISSING_COLUMN",
            Self::RowCountMismatch => "ROW_COUNT_MISMATCH",
            Self::UnexpectedTable => "UNEXPECTED_TABLE",
            Self::UnexpectedColumn => "UNEXPECTED_COLUMN",
            Self::CellValueMismatch => "CELL_VALUE_MISMATCH",
        }
    }

    /// Structural mismatches concern shape rather than cell values
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::CellValueMismatch)
    }
}

impl std::fmt::Display for MismatchCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A differing cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellMismatch {
    /// Table name (as named by the expected side)
    pub table: String,

    /// Zero-based row index
    pub row: usize,

    /// Column name (as named by the expected side)
    pub column: String,

    /// Expected value as supplied
    pub expected: Value,

    /// Actual value as supplied
    pub actual: Value,

    /// Name of the logical type used for the comparison
    pub compared_as: String,
}

/// One entry of a comparison result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mismatch {
    /// Expected table missing from actual
    MissingTable { table: String },

    /// Expected column missing from actual
    MissingColumn { table: String, column: String },

    /// Row counts differ
    RowCount {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Actual table not in expected
    UnexpectedTable { table: String },

    /// Actual column not in expected
    UnexpectedColumn { table: String, column: String },

    /// Cell values differ
    Cell(CellMismatch),
}

impl Mismatch {
    /// Stable code for this entry
    pub fn code(&self) -> MismatchCode {
        match self {
            Self::MissingTable { .. } => MismatchCode::MissingTable,
            Self::MissingColumn { .. } => MismatchCode::MissingColumn,
            Self::RowCount { .. } => MismatchCode::RowCountMismatch,
            Self::UnexpectedTable { .. } => MismatchCode::UnexpectedTable,
            Self::UnexpectedColumn { .. } => MismatchCode::UnexpectedColumn,
            Self::Cell(_) => MismatchCode::CellValueMismatch,
        }
    }

    /// Table this entry refers to
    pub fn table(&self) -> &str {
        match self {
            Self::MissingTable { table }
            | Self::MissingColumn { table, .. }
            | Self::RowCount { table, .. }
            | Self::UnexpectedTable { table }
            | Self::UnexpectedColumn { table, .. } => table,
            Self::Cell(cell) => &cell.table,
        }
    }

    /// Check if this is a structural mismatch
    pub fn is_structural(&self) -> bool {
        self.code().is_structural()
    }

    /// The cell details, for cell mismatches
    pub fn as_cell(&self) -> Option<&CellMismatch> {
        match self {
            Self::Cell(cell) => Some(cell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTable { table } => {
                write!(f, "[{}] table '{}' expected but not found", self.code(), table)
            }
            Self::MissingColumn { table, column } => write!(
                f,
                "[{}] column '{}.{}' expected but not found",
                self.code(),
                table,
                column
            ),
            Self::RowCount { table, expected, actual } => write!(
                f,
                "[{}] table '{}' row count: expected {}, got {}",
                self.code(),
                table,
                expected,
                actual
            ),
            Self::UnexpectedTable { table } => {
                write!(f, "[{}] table '{}' not in expected dataset", self.code(), table)
            }
            Self::UnexpectedColumn { table, column } => write!(
                f,
                "[{}] column '{}.{}' not in expected table",
                self.code(),
                table,
                column
            ),
            Self::Cell(cell) => write!(
                f,
                "[{}] {}[row {}].{} ({}): expected <{}>, got <{}>",
                self.code(),
                cell.table,
                cell.row,
                cell.column,
                cell.compared_as,
                cell.expected,
                cell.actual
            ),
        }
    }
}
