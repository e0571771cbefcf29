//! Sorted view over a table
//!
//! Row comparison is positional, so callers that need key-based correlation
//! sort both sides the same way before comparing.

use crate::error::DataSetError;
use crate::schema::{Column, TableMetadata};
use crate::table::Table;
use crate::value::Value;
use std::cmp::Ordering;
use std::sync::Arc;

/// A table whose rows are reordered by a list of columns
#[derive(Debug)]
pub struct SortedTable {
    inner: Arc<dyn Table>,
    order: Vec<usize>,
}

impl SortedTable {
    /// Sort by primary key columns, or by every column if there is none
    pub fn new(inner: Arc<dyn Table>) -> Result<Self, DataSetError> {
        let metadata = inner.metadata();
        let columns: Vec<Column> = if metadata.has_primary_key() {
            metadata.primary_key_columns().into_iter().cloned().collect()
        } else {
            metadata.columns.clone()
        };
        Self::by_typed_columns(inner, &columns)
    }

    /// Sort by the named columns using the table's own column types
    pub fn by_columns(inner: Arc<dyn Table>, names: &[&str]) -> Result<Self, DataSetError> {
        let columns = names
            .iter()
            .map(|name| {
                inner
                    .metadata()
                    .find_column(name)
                    .cloned()
                    .ok_or_else(|| DataSetError::NoSuchColumn {
                        table: inner.name().to_string(),
                        column: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::by_typed_columns(inner, &columns)
    }

    /// Sort by columns matched by name, ordering with the given columns' types
    ///
    /// Passing the actual table's column definitions lets an untyped fixture
    /// table sort the same way as the typed table it is compared against.
    pub fn by_typed_columns(inner: Arc<dyn Table>, columns: &[Column]) -> Result<Self, DataSetError> {
        let indexes = columns
            .iter()
            .map(|c| inner.metadata().column_index(&c.name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut keys: Vec<(usize, Vec<Value>)> = Vec::with_capacity(inner.row_count());
        for row in 0..inner.row_count() {
            let mut key = Vec::with_capacity(columns.len());
            for (column, index) in columns.iter().zip(&indexes) {
                let raw = inner.value(row, *index)?;
                let normalized = column
                    .logical_type
                    .data_type()
                    .normalize(raw)
                    .map_err(|source| DataSetError::Sort {
                        table: inner.name().to_string(),
                        source: Box::new(source),
                    })?;
                key.push(normalized);
            }
            keys.push((row, key));
        }

        keys.sort_by(|(_, a), (_, b)| compare_keys(a, b));
        let order = keys.into_iter().map(|(row, _)| row).collect();

        Ok(Self { inner, order })
    }
}

fn compare_keys(a: &[Value], b: &[Value]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

impl Table for SortedTable {
    fn metadata(&self) -> &TableMetadata {
        self.inner.metadata()
    }

    fn row_count(&self) -> usize {
        self.order.len()
    }

    fn value(&self, row: usize, column: usize) -> Result<&Value, DataSetError> {
        let source_row = *self.order.get(row).ok_or_else(|| DataSetError::RowOutOfBounds {
            table: self.inner.name().to_string(),
            row,
            row_count: self.order.len(),
        })?;
        self.inner.value(source_row, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;
    use crate::table::DefaultTable;

    fn table(id_type: DataType) -> Arc<dyn Table> {
        let metadata = TableMetadata::new(
            "ITEMS",
            vec![Column::new("ID", id_type), Column::new("LABEL", DataType::Varchar)],
        )
        .with_primary_key(["ID"]);
        DefaultTable::from_rows(
            metadata,
            vec![
                vec!["10".into(), "ten".into()],
                vec!["9".into(), "nine".into()],
                vec![Value::Null, "none".into()],
            ],
        )
        .unwrap()
        .into_shared()
    }

    #[test]
    fn sorts_by_primary_key_type() {
        let sorted = SortedTable::new(table(DataType::Integer)).unwrap();
        let labels: Vec<String> = (0..sorted.row_count())
            .map(|row| sorted.value(row, 1).unwrap().to_string())
            .collect();
        assert_eq!(labels, vec!["none", "nine", "ten"]);
    }

    #[test]
    fn untyped_sorts_as_text_unless_types_are_supplied() {
        let untyped = table(DataType::Unknown);
        let as_text = SortedTable::new(Arc::clone(&untyped)).unwrap();
        assert_eq!(as_text.value(1, 1).unwrap(), &Value::from("ten"));

        let typed = SortedTable::by_typed_columns(untyped, &[Column::new("id", DataType::Integer)]).unwrap();
        assert_eq!(typed.value(1, 1).unwrap(), &Value::from("nine"));
    }

    #[test]
    fn unconvertible_sort_key_fails() {
        let metadata = TableMetadata::new("T", vec![Column::new("N", DataType::Integer)]);
        let inner = DefaultTable::from_rows(metadata, vec![vec!["x".into()]]).unwrap().into_shared();
        assert!(matches!(SortedTable::new(inner), Err(DataSetError::Sort { .. })));
    }

    #[test]
    fn unknown_sort_column_fails() {
        assert!(SortedTable::by_columns(table(DataType::Integer), &["NOPE"]).is_err());
    }
}
