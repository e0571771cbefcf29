//! Table metadata: columns, primary keys and foreign keys

use crate::datatype::{DataType, LogicalType};
use crate::error::DataSetError;
use serde::{Deserialize, Serialize};

/// Nullability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nullability {
    /// Definitely nullable
    Yes,

    /// Definitely not nullable
    No,

    /// Cannot determine nullability
    Unknown,
}

/// A column in a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Logical type
    pub logical_type: LogicalType,

    /// Nullability
    pub nullable: Nullability,
}

impl Column {
    /// Create a new column with unknown nullability
    pub fn new(name: impl Into<String>, logical_type: impl Into<LogicalType>) -> Self {
        Self {
            name: name.into(),
            logical_type: logical_type.into(),
            nullable: Nullability::Unknown,
        }
    }

    /// Create an untyped column, as produced by flat fixture files
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Unknown)
    }

    /// Set nullability
    pub fn with_nullability(mut self, nullable: Nullability) -> Self {
        self.nullable = nullable;
        self
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A foreign key from one table to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name
    pub name: Option<String>,

    /// Referencing columns in the owning table
    pub columns: Vec<String>,

    /// Referenced table name
    pub referenced_table: String,

    /// Referenced columns (normally the primary key)
    pub referenced_columns: Vec<String>,
}

impl ForeignKey {
    /// Create an unnamed foreign key
    pub fn new(
        columns: Vec<String>,
        referenced_table: impl Into<String>,
        referenced_columns: Vec<String>,
    ) -> Self {
        Self {
            name: None,
            columns,
            referenced_table: referenced_table.into(),
            referenced_columns,
        }
    }

    /// Set constraint name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Metadata describing a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Table name
    pub name: String,

    /// Ordered list of columns
    pub columns: Vec<Column>,

    /// Primary key column names
    #[serde(default)]
    pub primary_key: Vec<String>,

    /// Foreign key constraints
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableMetadata {
    /// Create metadata with columns and no keys
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    /// Set primary key columns
    pub fn with_primary_key<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add a foreign key
    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Case-insensitive table name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Check if the table has a primary key
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// Find a column by name (case-insensitive)
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.has_name(name))
    }

    /// Position of a column by name (case-insensitive)
    pub fn column_index(&self, name: &str) -> Result<usize, DataSetError> {
        self.columns
            .iter()
            .position(|c| c.has_name(name))
            .ok_or_else(|| DataSetError::NoSuchColumn {
                table: self.name.clone(),
                column: name.to_string(),
            })
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Primary key columns, in key order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.primary_key
            .iter()
            .filter_map(|name| self.find_column(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> TableMetadata {
        TableMetadata::new(
            "ORDERS",
            vec![
                Column::new("ID", DataType::Integer).with_nullability(Nullability::No),
                Column::new("CUSTOMER_ID", DataType::Integer),
                Column::new("TOTAL", DataType::Numeric),
            ],
        )
        .with_primary_key(["ID"])
        .with_foreign_key(ForeignKey::new(
            vec!["CUSTOMER_ID".into()],
            "CUSTOMER",
            vec!["ID".into()],
        ))
    }

    #[test]
    fn column_lookup_ignores_case() {
        let table = orders();
        assert_eq!(table.column_index("total").unwrap(), 2);
        assert!(table.find_column("Customer_Id").is_some());
        assert!(matches!(
            table.column_index("missing"),
            Err(DataSetError::NoSuchColumn { .. })
        ));
    }

    #[test]
    fn primary_key_columns() {
        let table = orders();
        assert!(table.has_primary_key());
        let pk: Vec<&str> = table.primary_key_columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(pk, vec!["ID"]);
        assert!(table.has_name("orders"));
    }

    #[test]
    fn untyped_columns_are_unknown() {
        assert!(Column::untyped("X").logical_type.is_unknown());
    }
}
