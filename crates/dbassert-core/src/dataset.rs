//! Ordered collections of tables

use crate::error::DataSetError;
use crate::table::{CompositeTable, Table};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How same-named tables from several datasets are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// The first dataset supplying a table wins
    #[default]
    FirstWins,

    /// Same-named tables are concatenated row-wise
    Combine,
}

/// Ordered collection of tables with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    tables: Vec<Arc<dyn Table>>,
}

impl DataSet {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset from tables, rejecting duplicate names
    pub fn from_tables(tables: Vec<Arc<dyn Table>>) -> Result<Self, DataSetError> {
        let mut dataset = Self::new();
        for table in tables {
            dataset.add_table(table)?;
        }
        Ok(dataset)
    }

    /// Compose several datasets into one
    pub fn composite(datasets: &[DataSet], policy: MergePolicy) -> Result<Self, DataSetError> {
        let mut groups: Vec<Vec<Arc<dyn Table>>> = Vec::new();

        for table in datasets.iter().flat_map(|d| d.tables.iter()) {
            match groups.iter_mut().find(|g| g[0].metadata().has_name(table.name())) {
                Some(group) => group.push(Arc::clone(table)),
                None => groups.push(vec![Arc::clone(table)]),
            }
        }

        let tables = groups
            .into_iter()
            .map(|mut group| match policy {
                MergePolicy::FirstWins => Ok(group.swap_remove(0)),
                MergePolicy::Combine if group.len() == 1 => Ok(group.swap_remove(0)),
                MergePolicy::Combine => CompositeTable::new(group).map(|t| Arc::new(t) as Arc<dyn Table>),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tables })
    }

    /// Append a table
    pub fn add_table(&mut self, table: Arc<dyn Table>) -> Result<(), DataSetError> {
        if self.contains(table.name()) {
            return Err(DataSetError::DuplicateTable(table.name().to_string()));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Table names in insertion order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name()).collect()
    }

    /// Look up a table by name (case-insensitive)
    pub fn table(&self, name: &str) -> Option<&Arc<dyn Table>> {
        self.tables.iter().find(|t| t.metadata().has_name(name))
    }

    /// Look up a table by name, failing if it is absent
    pub fn require_table(&self, name: &str) -> Result<&Arc<dyn Table>, DataSetError> {
        self.table(name)
            .ok_or_else(|| DataSetError::NoSuchTable(name.to_string()))
    }

    /// Check if a table exists
    pub fn contains(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Iterate tables in insertion order
    pub fn tables(&self) -> impl Iterator<Item = &Arc<dyn Table>> {
        self.tables.iter()
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the dataset has no tables
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, TableMetadata};
    use crate::table::DefaultTable;
    use crate::value::Value;

    fn table(name: &str, rows: &[&str]) -> Arc<dyn Table> {
        let metadata = TableMetadata::new(name, vec![Column::untyped("V")]);
        let rows = rows.iter().map(|v| vec![Value::from(*v)]).collect();
        DefaultTable::from_rows(metadata, rows).unwrap().into_shared()
    }

    #[test]
    fn keeps_insertion_order() {
        let dataset = DataSet::from_tables(vec![table("B", &[]), table("A", &[])]).unwrap();
        assert_eq!(dataset.table_names(), vec!["B", "A"]);
        assert!(dataset.contains("b"));
        assert!(dataset.require_table("C").is_err());
    }

    #[test]
    fn rejects_duplicates() {
        let err = DataSet::from_tables(vec![table("A", &[]), table("a", &[])]).unwrap_err();
        assert_eq!(err, DataSetError::DuplicateTable("a".into()));
    }

    #[test]
    fn composite_first_wins() {
        let first = DataSet::from_tables(vec![table("A", &["1"])]).unwrap();
        let second = DataSet::from_tables(vec![table("A", &["2", "3"]), table("B", &[])]).unwrap();
        let merged = DataSet::composite(&[first, second], MergePolicy::FirstWins).unwrap();

        assert_eq!(merged.table_names(), vec!["A", "B"]);
        assert_eq!(merged.require_table("A").unwrap().row_count(), 1);
    }

    #[test]
    fn composite_combine_concatenates_rows() {
        let first = DataSet::from_tables(vec![table("A", &["1"])]).unwrap();
        let second = DataSet::from_tables(vec![table("A", &["2", "3"])]).unwrap();
        let merged = DataSet::composite(&[first, second], MergePolicy::Combine).unwrap();

        let combined = merged.require_table("a").unwrap();
        assert_eq!(combined.row_count(), 3);
        assert_eq!(combined.value(2, 0).unwrap(), &Value::from("3"));
    }
}
