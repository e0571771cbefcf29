//! Tabular data access
//!
//! Tables are read-only once built. Rows are addressed positionally and
//! columns either by position or by case-insensitive name.

use crate::error::DataSetError;
use crate::schema::{Column, TableMetadata};
use crate::value::Value;
use std::sync::Arc;

/// Positional access to a table's rows
pub trait Table: std::fmt::Debug + Send + Sync {
    /// Table metadata
    fn metadata(&self) -> &TableMetadata;

    /// Number of rows
    fn row_count(&self) -> usize;

    /// Value at (row, column)
    fn value(&self, row: usize, column: usize) -> Result<&Value, DataSetError>;

    /// Table name
    fn name(&self) -> &str {
        &self.metadata().name
    }

    /// Ordered columns
    fn columns(&self) -> &[Column] {
        &self.metadata().columns
    }

    /// Value at (row, named column)
    fn value_by_name(&self, row: usize, column: &str) -> Result<&Value, DataSetError> {
        let index = self.metadata().column_index(column)?;
        self.value(row, index)
    }
}

/// In-memory table
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTable {
    metadata: TableMetadata,
    rows: Vec<Vec<Value>>,
}

impl DefaultTable {
    /// Create an empty table
    pub fn new(metadata: TableMetadata) -> Self {
        Self {
            metadata,
            rows: Vec::new(),
        }
    }

    /// Create a table from rows, checking every row's width
    pub fn from_rows(metadata: TableMetadata, rows: Vec<Vec<Value>>) -> Result<Self, DataSetError> {
        let mut table = Self::new(metadata);
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// Append a row
    pub fn add_row(&mut self, row: Vec<Value>) -> Result<(), DataSetError> {
        if row.len() != self.metadata.columns.len() {
            return Err(DataSetError::RowWidth {
                table: self.metadata.name.clone(),
                expected: self.metadata.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Wrap in an `Arc` for use in datasets
    pub fn into_shared(self) -> Arc<dyn Table> {
        Arc::new(self)
    }
}

impl Table for DefaultTable {
    fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize, column: usize) -> Result<&Value, DataSetError> {
        let values = self.rows.get(row).ok_or_else(|| DataSetError::RowOutOfBounds {
            table: self.metadata.name.clone(),
            row,
            row_count: self.rows.len(),
        })?;
        values.get(column).ok_or_else(|| DataSetError::ColumnOutOfBounds {
            table: self.metadata.name.clone(),
            column,
        })
    }
}

/// Row-wise concatenation of same-named tables
///
/// Uses the first table's metadata. Every later table must supply each of
/// those columns by name; column order may differ.
#[derive(Debug)]
pub struct CompositeTable {
    parts: Vec<Arc<dyn Table>>,
    column_maps: Vec<Vec<usize>>,
    row_count: usize,
}

impl CompositeTable {
    /// Combine tables; the first one defines the metadata
    pub fn new(parts: Vec<Arc<dyn Table>>) -> Result<Self, DataSetError> {
        let first = parts
            .first()
            .ok_or_else(|| DataSetError::NoSuchTable("<empty composite>".to_string()))?;
        let metadata = first.metadata().clone();

        let mut column_maps = Vec::with_capacity(parts.len());
        for part in &parts {
            let map = metadata
                .columns
                .iter()
                .map(|column| part.metadata().column_index(&column.name))
                .collect::<Result<Vec<_>, _>>()?;
            column_maps.push(map);
        }

        let row_count = parts.iter().map(|p| p.row_count()).sum();
        Ok(Self {
            parts,
            column_maps,
            row_count,
        })
    }
}

impl Table for CompositeTable {
    fn metadata(&self) -> &TableMetadata {
        self.parts[0].metadata()
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn value(&self, row: usize, column: usize) -> Result<&Value, DataSetError> {
        let mut offset = row;
        for (part, map) in self.parts.iter().zip(&self.column_maps) {
            if offset < part.row_count() {
                let index = *map.get(column).ok_or_else(|| DataSetError::ColumnOutOfBounds {
                    table: self.name().to_string(),
                    column,
                })?;
                return part.value(offset, index);
            }
            offset -= part.row_count();
        }
        Err(DataSetError::RowOutOfBounds {
            table: self.name().to_string(),
            row,
            row_count: self.row_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;

    fn people(columns: &[&str], rows: Vec<Vec<Value>>) -> DefaultTable {
        let metadata = TableMetadata::new(
            "PEOPLE",
            columns.iter().map(|c| Column::new(*c, DataType::Varchar)).collect(),
        );
        DefaultTable::from_rows(metadata, rows).unwrap()
    }

    #[test]
    fn positional_and_named_access() {
        let table = people(&["ID", "NAME"], vec![vec!["1".into(), "ann".into()]]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.value(0, 1).unwrap(), &Value::from("ann"));
        assert_eq!(table.value_by_name(0, "name").unwrap(), &Value::from("ann"));
        assert!(matches!(table.value(1, 0), Err(DataSetError::RowOutOfBounds { .. })));
        assert!(matches!(table.value(0, 5), Err(DataSetError::ColumnOutOfBounds { .. })));
    }

    #[test]
    fn row_width_is_checked() {
        let metadata = TableMetadata::new("T", vec![Column::untyped("A")]);
        let err = DefaultTable::from_rows(metadata, vec![vec![Value::Null, Value::Null]]).unwrap_err();
        assert_eq!(
            err,
            DataSetError::RowWidth {
                table: "T".into(),
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn composite_maps_columns_by_name() {
        let first = people(&["ID", "NAME"], vec![vec!["1".into(), "ann".into()]]);
        let second = people(&["NAME", "ID"], vec![vec!["bob".into(), "2".into()]]);
        let combined = CompositeTable::new(vec![first.into_shared(), second.into_shared()]).unwrap();

        assert_eq!(combined.row_count(), 2);
        assert_eq!(combined.value(1, 0).unwrap(), &Value::from("2"));
        assert_eq!(combined.value(1, 1).unwrap(), &Value::from("bob"));
        assert!(combined.value(2, 0).is_err());
    }

    #[test]
    fn composite_requires_all_columns() {
        let first = people(&["ID", "NAME"], vec![]);
        let second = people(&["ID"], vec![]);
        let err = CompositeTable::new(vec![first.into_shared(), second.into_shared()]).unwrap_err();
        assert!(matches!(err, DataSetError::NoSuchColumn { .. }));
    }
}
