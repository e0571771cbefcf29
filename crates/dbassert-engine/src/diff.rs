//! Table and dataset comparison
//!
//! Comparison is driven by the expected side. Expected columns are reduced by
//! the column filters and the ignored names; each remaining column must exist
//! in the actual table and its cells are compared positionally, row by row.
//! Every mismatch is collected before returning.

use crate::error::DiffError;
use crate::filter::ColumnFilter;
use dbassert_core::{
    AssertionConfig, CellMismatch, Column, ComparisonMode, ComparisonResult, DataSet, LogicalType, Mismatch,
    Table,
};
use dbassert_types::{ConfigurationError, TypeRegistry};
use std::sync::Arc;

/// A compared column pair
struct ColumnPair<'a> {
    name: &'a str,
    expected_index: usize,
    actual_index: usize,
    logical_type: LogicalType,
}

/// Column exclusion rules for one comparison call
struct Exclusions<'a> {
    filters: &'a [&'a dyn ColumnFilter],
    ignored: &'a [&'a str],
}

impl Exclusions<'_> {
    fn excludes(&self, table: &str, column: &str) -> bool {
        self.ignored.iter().any(|name| name.eq_ignore_ascii_case(column))
            || self.filters.iter().any(|filter| !filter.accept(table, column))
    }
}

/// Compares tables and datasets using a shared type registry
#[derive(Debug, Clone)]
pub struct DiffEngine {
    registry: Arc<TypeRegistry>,
    mode: ComparisonMode,
}

impl DiffEngine {
    /// Create a non-strict engine
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            mode: ComparisonMode::NonStrict,
        }
    }

    /// Set the comparison mode
    pub fn with_mode(mut self, mode: ComparisonMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build an engine and its registry from configuration
    pub fn from_config(config: &AssertionConfig) -> Result<Self, ConfigurationError> {
        let registry = TypeRegistry::from_config(config)?;
        Ok(Self::new(Arc::new(registry)).with_mode(config.mode))
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    fn is_strict(&self) -> bool {
        self.mode == ComparisonMode::Strict
    }

    /// Compare two tables
    ///
    /// The result is named after the expected table. Cells are compared as
    /// the actual column's type when known, else the expected column's, with
    /// any registered tolerance applied.
    pub fn compare_tables(
        &self,
        expected: &dyn Table,
        actual: &dyn Table,
        column_filters: &[&dyn ColumnFilter],
        ignored_columns: &[&str],
    ) -> Result<ComparisonResult, DiffError> {
        let exclusions = Exclusions {
            filters: column_filters,
            ignored: ignored_columns,
        };
        self.compare_table_pair(expected, actual, &exclusions)
    }

    fn compare_table_pair(
        &self,
        expected: &dyn Table,
        actual: &dyn Table,
        exclusions: &Exclusions<'_>,
    ) -> Result<ComparisonResult, DiffError> {
        let table = expected.name();
        let mut result = ComparisonResult::new();

        let mut pairs = Vec::new();
        for (expected_index, column) in expected.columns().iter().enumerate() {
            if exclusions.excludes(table, &column.name) {
                tracing::trace!(table, column = %column.name, "column excluded");
                continue;
            }

            match position(actual.columns(), &column.name) {
                Some(actual_index) => pairs.push(ColumnPair {
                    name: &column.name,
                    expected_index,
                    actual_index,
                    logical_type: self.column_type(table, column, &actual.columns()[actual_index]),
                }),
                None => result.push(Mismatch::MissingColumn {
                    table: table.to_string(),
                    column: column.name.clone(),
                }),
            }
        }

        if self.is_strict() {
            for column in actual.columns() {
                if position(expected.columns(), &column.name).is_none()
                    && !exclusions.excludes(table, &column.name)
                {
                    result.push(Mismatch::UnexpectedColumn {
                        table: table.to_string(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        let (expected_rows, actual_rows) = (expected.row_count(), actual.row_count());
        if expected_rows != actual_rows {
            result.push(Mismatch::RowCount {
                table: table.to_string(),
                expected: expected_rows,
                actual: actual_rows,
            });
        }

        let rows = expected_rows.min(actual_rows);
        for row in 0..rows {
            for pair in &pairs {
                let expected_value = expected.value(row, pair.expected_index)?;
                let actual_value = actual.value(row, pair.actual_index)?;

                let equal = pair
                    .logical_type
                    .matches(expected_value, actual_value)
                    .map_err(|source| DiffError::Conversion {
                        table: table.to_string(),
                        row,
                        column: pair.name.to_string(),
                        source: Box::new(source),
                    })?;

                if !equal {
                    result.push(Mismatch::Cell(CellMismatch {
                        table: table.to_string(),
                        row,
                        column: pair.name.to_string(),
                        expected: expected_value.clone(),
                        actual: actual_value.clone(),
                        compared_as: pair.logical_type.name().to_string(),
                    }));
                }
            }
        }

        result.record_table(rows * pairs.len());
        tracing::debug!(
            table,
            columns = pairs.len(),
            rows,
            mismatches = result.mismatches.len(),
            "compared table"
        );
        Ok(result)
    }

    /// Type used to compare a column pair
    fn column_type(&self, table: &str, expected: &Column, actual: &Column) -> LogicalType {
        let base = if actual.logical_type.is_unknown() {
            expected.logical_type
        } else {
            actual.logical_type
        };
        self.registry.with_tolerance(table, &expected.name, base)
    }

    /// Compare two datasets
    ///
    /// Every expected table is looked up in `actual`; missing ones are
    /// reported. Tables only present in `actual` are reported in strict mode
    /// and ignored otherwise.
    pub fn compare_datasets(
        &self,
        expected: &DataSet,
        actual: &DataSet,
        column_filters: &[&dyn ColumnFilter],
        ignored_columns: &[&str],
    ) -> Result<ComparisonResult, DiffError> {
        let exclusions = Exclusions {
            filters: column_filters,
            ignored: ignored_columns,
        };
        let mut result = ComparisonResult::new();

        for expected_table in expected.tables() {
            match actual.table(expected_table.name()) {
                Some(actual_table) => {
                    let table_result =
                        self.compare_table_pair(expected_table.as_ref(), actual_table.as_ref(), &exclusions)?;
                    result.merge(table_result);
                }
                None => result.push(Mismatch::MissingTable {
                    table: expected_table.name().to_string(),
                }),
            }
        }

        if self.is_strict() {
            for actual_table in actual.tables() {
                if !expected.contains(actual_table.name()) {
                    result.push(Mismatch::UnexpectedTable {
                        table: actual_table.name().to_string(),
                    });
                }
            }
        }

        if !result.passed() {
            tracing::debug!(
                structural = result.summary.structural,
                cells = result.summary.cells,
                "dataset comparison failed"
            );
        }
        Ok(result)
    }
}

fn position(columns: &[Column], name: &str) -> Option<usize> {
    columns.iter().position(|c| c.has_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbassert_core::{DataType, DefaultTable, TableMetadata, Value};

    fn engine() -> DiffEngine {
        DiffEngine::new(Arc::new(TypeRegistry::new()))
    }

    fn table(name: &str, columns: Vec<Column>, rows: Vec<Vec<Value>>) -> DefaultTable {
        DefaultTable::from_rows(TableMetadata::new(name, columns), rows).unwrap()
    }

    #[test]
    fn actual_type_wins_over_expected() {
        let expected = table("T", vec![Column::untyped("N")], vec![vec!["1.0".into()]]);
        let actual = table("T", vec![Column::new("N", DataType::Double)], vec![vec![1.0.into()]]);

        let result = engine().compare_tables(&expected, &actual, &[], &[]).unwrap();
        assert!(result.passed());
    }

    #[test]
    fn expected_type_used_when_actual_unknown() {
        let expected = table("T", vec![Column::new("N", DataType::Integer)], vec![vec!["7".into()]]);
        let actual = table("T", vec![Column::untyped("N")], vec![vec![Value::Int(7)]]);

        let result = engine().compare_tables(&expected, &actual, &[], &[]).unwrap();
        assert!(result.passed());
    }

    #[test]
    fn untyped_columns_compare_raw() {
        let expected = table("T", vec![Column::untyped("N")], vec![vec!["7".into()]]);
        let actual = table("T", vec![Column::untyped("N")], vec![vec![Value::Int(7)]]);

        let result = engine().compare_tables(&expected, &actual, &[], &[]).unwrap();
        assert_eq!(result.summary.cells, 1);
        assert_eq!(result.cell_mismatches().next().unwrap().compared_as, "UNKNOWN");
    }

    #[test]
    fn conversion_failure_names_the_cell() {
        let expected = table("T", vec![Column::new("N", DataType::Integer)], vec![vec!["seven".into()]]);
        let actual = table("T", vec![Column::new("N", DataType::Integer)], vec![vec![Value::Int(7)]]);

        let err = engine().compare_tables(&expected, &actual, &[], &[]).unwrap_err();
        match err {
            DiffError::Conversion { table, row, column, .. } => {
                assert_eq!((table.as_str(), row, column.as_str()), ("T", 0, "N"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
