//! Configuration schema (dbassert.toml)
//!
//! ```toml
//! vendor = "mssql"
//! mode = "non_strict"
//! ignored_columns = ["LAST_MODIFIED"]
//!
//! [columns]
//! exclude = ["AUDIT_*"]
//!
//! [[tolerances]]
//! table = "ORDERS"
//! column = "TOTAL"
//! delta = "0.01"
//! ```

use crate::dataset::MergePolicy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Database vendor whose type mapping is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorKind {
    /// Generic SQL type codes only
    #[default]
    Default,

    /// Microsoft SQL Server
    Mssql,

    /// H2
    H2,

    /// PostgreSQL
    Postgres,
}

/// How extra actual-side columns and tables are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Columns and tables absent from expected are ignored
    #[default]
    NonStrict,

    /// Columns and tables absent from expected are reported
    Strict,
}

/// A numeric tolerance entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToleranceConfig {
    /// Table name, or `*` for any table
    #[serde(default = "any_table")]
    pub table: String,

    /// Column name
    pub column: String,

    /// Largest absolute difference still considered equal
    pub delta: Decimal,
}

fn any_table() -> String {
    "*".to_string()
}

/// Column include/exclude patterns (`*` and `?` wildcards)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnRules {
    /// Only columns matching one of these are compared (empty means all)
    #[serde(default)]
    pub include: Vec<String>,

    /// Columns matching one of these are never compared
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl ColumnRules {
    /// Check if no rule is configured
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssertionConfig {
    /// Vendor profile
    #[serde(default)]
    pub vendor: VendorKind,

    /// Comparison mode
    #[serde(default)]
    pub mode: ComparisonMode,

    /// Merge policy for composite datasets
    #[serde(default)]
    pub merge_policy: MergePolicy,

    /// Column names ignored in every table
    #[serde(default)]
    pub ignored_columns: Vec<String>,

    /// Column filter patterns
    #[serde(default)]
    pub columns: ColumnRules,

    /// Numeric tolerances
    #[serde(default)]
    pub tolerances: Vec<ToleranceConfig>,
}

impl AssertionConfig {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn default_config() {
        let config = AssertionConfig::default();
        assert_eq!(config.vendor, VendorKind::Default);
        assert_eq!(config.mode, ComparisonMode::NonStrict);
        assert!(config.columns.is_empty());
    }

    #[test]
    fn parse_full_document() {
        let config = AssertionConfig::from_toml(
            r#"
            vendor = "mssql"
            mode = "strict"
            merge_policy = "combine"
            ignored_columns = ["LAST_MODIFIED"]

            [columns]
            exclude = ["AUDIT_*"]

            [[tolerances]]
            table = "ORDERS"
            column = "TOTAL"
            delta = "0.01"

            [[tolerances]]
            column = "PRICE"
            delta = "0.5"
            "#,
        )
        .unwrap();

        assert_eq!(config.vendor, VendorKind::Mssql);
        assert_eq!(config.mode, ComparisonMode::Strict);
        assert_eq!(config.merge_policy, MergePolicy::Combine);
        assert_eq!(config.ignored_columns, vec!["LAST_MODIFIED"]);
        assert_eq!(config.columns.exclude, vec!["AUDIT_*"]);
        assert_eq!(config.tolerances[0].delta, Decimal::from_str("0.01").unwrap());
        assert_eq!(config.tolerances[1].table, "*");
    }

    #[test]
    fn rejects_unknown_vendor() {
        let err = AssertionConfig::from_toml(r#"vendor = "oracle""#).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dbassert.toml");

        let mut config = AssertionConfig::default();
        config.vendor = VendorKind::Postgres;
        config.ignored_columns.push("UPDATED_AT".into());
        config.save_to_file(&path).unwrap();

        let loaded = AssertionConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AssertionConfig::from_file(std::path::Path::new("/nonexistent/dbassert.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
