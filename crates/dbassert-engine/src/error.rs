//! Diff engine errors
//!
//! Mismatches are never errors; these cover comparisons that cannot be
//! carried out at all.

use dbassert_core::{AssertionFailure, ConfigError, DataSetError, TypeConversionError};
use dbassert_types::ConfigurationError;

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// A cell value could not be coerced to its column type
    #[error("Cannot compare {table}[row {row}].{column}: {source}")]
    Conversion {
        table: String,
        row: usize,
        column: String,
        #[source]
        source: Box<TypeConversionError>,
    },

    #[error(transparent)]
    DataSet(#[from] DataSetError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The comparison ran and found mismatches
    #[error(transparent)]
    Assertion(Box<AssertionFailure>),
}

impl From<AssertionFailure> for DiffError {
    fn from(failure: AssertionFailure) -> Self {
        Self::Assertion(Box::new(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_stays_small() {
        assert!(std::mem::size_of::<DiffError>() <= 128);
    }

    #[test]
    fn assertion_failure_converts_boxed() {
        let failure = dbassert_core::ComparisonResult::new().into_result();
        assert!(failure.is_ok());

        let mut result = dbassert_core::ComparisonResult::new();
        result.push(dbassert_core::Mismatch::MissingTable { table: "T".to_string() });
        let err = DiffError::from(result.into_result().unwrap_err());
        assert!(matches!(&err, DiffError::Assertion(failure) if failure.result.summary.structural == 1));
    }
}
