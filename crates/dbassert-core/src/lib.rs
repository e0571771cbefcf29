//! dbassert core
//!
//! Data model shared by the type registry, the dependency resolver and the
//! diff engine: values, canonical types, table metadata, tables, datasets and
//! comparison results.
//! Mismatch codes are part of the public API - never rename them.

pub mod config;
pub mod datatype;
pub mod dataset;
pub mod error;
pub mod mismatch;
pub mod report;
pub mod schema;
pub mod sorted;
pub mod sql_types;
pub mod table;
pub mod value;

pub use config::{AssertionConfig, ColumnRules, ComparisonMode, ConfigError, ToleranceConfig, VendorKind};
pub use datatype::{DataType, LogicalType, TypeFamily};
pub use dataset::{DataSet, MergePolicy};
pub use error::{DataSetError, TypeConversionError};
pub use mismatch::{CellMismatch, Mismatch, MismatchCode};
pub use report::{AssertionFailure, ComparisonResult, ComparisonSummary};
pub use schema::{Column, ForeignKey, Nullability, TableMetadata};
pub use sorted::SortedTable;
pub use table::{CompositeTable, DefaultTable, Table};
pub use value::Value;
