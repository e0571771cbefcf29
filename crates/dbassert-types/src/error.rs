//! Registry configuration errors

use rust_decimal::Decimal;

/// Invalid registry configuration, reported at registration time
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Tolerated delta for {table}.{column} must not be negative: {delta}")]
    NegativeDelta {
        table: String,
        column: String,
        delta: Decimal,
    },

    #[error("Tolerance for table {table} has an empty column name")]
    EmptyColumn { table: String },

    #[error("Driver adapter '{adapter}' is unavailable: {reason}")]
    AdapterUnavailable { adapter: String, reason: String },
}
