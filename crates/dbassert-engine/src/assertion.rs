//! Configured assertions
//!
//! Bundles an engine with the filters and ignored columns read from a
//! `dbassert.toml`, for test harnesses that want a single call.

use crate::diff::DiffEngine;
use crate::error::DiffError;
use crate::filter::{ColumnFilter, PatternColumnFilter};
use dbassert_core::{AssertionConfig, ComparisonResult, DataSet, MergePolicy, Table};
use std::path::Path;

/// Engine plus the column rules of one configuration
#[derive(Debug, Clone)]
pub struct DbAssertion {
    engine: DiffEngine,
    filter: PatternColumnFilter,
    ignored_columns: Vec<String>,
    merge_policy: MergePolicy,
}

impl DbAssertion {
    /// Build from a parsed configuration
    pub fn from_config(config: &AssertionConfig) -> Result<Self, DiffError> {
        let engine = DiffEngine::from_config(config)?;
        tracing::debug!(
            vendor = engine.registry().vendor_name(),
            mode = ?config.mode,
            tolerances = config.tolerances.len(),
            "configured assertion"
        );

        Ok(Self {
            engine,
            filter: PatternColumnFilter::from_rules(&config.columns),
            ignored_columns: config.ignored_columns.clone(),
            merge_policy: config.merge_policy,
        })
    }

    /// Load a configuration file and build from it
    pub fn from_file(path: &Path) -> Result<Self, DiffError> {
        let config = AssertionConfig::from_file(path)?;
        Self::from_config(&config)
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    fn ignored(&self) -> Vec<&str> {
        self.ignored_columns.iter().map(String::as_str).collect()
    }

    fn filters(&self) -> Vec<&dyn ColumnFilter> {
        if self.filter.is_empty() {
            Vec::new()
        } else {
            vec![&self.filter as &dyn ColumnFilter]
        }
    }

    /// Compare two tables with the configured rules
    pub fn compare_tables(&self, expected: &dyn Table, actual: &dyn Table) -> Result<ComparisonResult, DiffError> {
        self.engine
            .compare_tables(expected, actual, &self.filters(), &self.ignored())
    }

    /// Compare two datasets with the configured rules
    pub fn compare_datasets(&self, expected: &DataSet, actual: &DataSet) -> Result<ComparisonResult, DiffError> {
        self.engine
            .compare_datasets(expected, actual, &self.filters(), &self.ignored())
    }

    /// Merge several expected datasets with the configured policy, then compare
    pub fn compare_composite(&self, expected: &[DataSet], actual: &DataSet) -> Result<ComparisonResult, DiffError> {
        let merged = DataSet::composite(expected, self.merge_policy)?;
        self.compare_datasets(&merged, actual)
    }

    /// Fail with the rendered report unless the datasets match
    pub fn assert_equals(&self, expected: &DataSet, actual: &DataSet) -> Result<(), DiffError> {
        self.compare_datasets(expected, actual)?.into_result()?;
        Ok(())
    }
}
