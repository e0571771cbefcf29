//! Test fixtures for dataset comparison
//!
//! Expected tables look like flat fixture files: untyped columns holding
//! text. Actual tables look like query results: typed columns holding
//! native values.

#![allow(dead_code)]

use dbassert_core::{Column, DataSet, DataType, DefaultTable, Nullability, Table, TableMetadata, Value};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Untyped table with text cells; `None` is a null cell
pub fn fixture_table(name: &str, columns: &[&str], rows: &[&[Option<&str>]]) -> Arc<dyn Table> {
    let metadata = TableMetadata::new(name, columns.iter().map(|c| Column::untyped(*c)).collect());
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| Value::from(*cell)).collect())
        .collect();
    DefaultTable::from_rows(metadata, rows).unwrap().into_shared()
}

/// Orders table as read from the database
///
/// Columns: ID INTEGER (pk), TOTAL NUMERIC, STATUS VARCHAR, LAST_MODIFIED TIMESTAMP
pub fn orders_actual(rows: &[(i64, &str, &str)]) -> Arc<dyn Table> {
    let metadata = TableMetadata::new(
        "ORDERS",
        vec![
            Column::new("ID", DataType::Integer).with_nullability(Nullability::No),
            Column::new("TOTAL", DataType::Numeric),
            Column::new("STATUS", DataType::Varchar),
            Column::new("LAST_MODIFIED", DataType::Timestamp),
        ],
    )
    .with_primary_key(["ID"]);

    let rows = rows
        .iter()
        .enumerate()
        .map(|(i, (id, total, status))| {
            vec![
                Value::Int(*id),
                Value::Decimal(dec(total)),
                Value::from(*status),
                Value::from(format!("2024-01-0{} 12:00:00", i + 1)),
            ]
        })
        .collect();
    DefaultTable::from_rows(metadata, rows).unwrap().into_shared()
}

/// Orders fixture without LAST_MODIFIED
pub fn orders_expected(rows: &[(&str, &str, &str)]) -> Arc<dyn Table> {
    let rows: Vec<Vec<Option<&str>>> = rows
        .iter()
        .map(|(id, total, status)| vec![Some(*id), Some(*total), Some(*status)])
        .collect();
    let rows: Vec<&[Option<&str>]> = rows.iter().map(Vec::as_slice).collect();
    fixture_table("ORDERS", &["ID", "TOTAL", "STATUS"], &rows)
}

/// Key table referenced by other fixtures
pub fn pk_table() -> Arc<dyn Table> {
    fixture_table("PK_TABLE", &["PK0", "NORMAL0"], &[&[Some("0"), Some("foo")], &[Some("1"), Some("bar")]])
}

pub fn dataset(tables: Vec<Arc<dyn Table>>) -> DataSet {
    DataSet::from_tables(tables).unwrap()
}
