//! Numeric tolerances per table and column

use crate::error::ConfigurationError;
use rust_decimal::Decimal;

/// Table name matching any table
pub const ANY_TABLE: &str = "*";

/// A registered tolerance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToleratedDelta {
    /// Table name, or `*`
    pub table: String,

    /// Column name
    pub column: String,

    /// Largest absolute difference still considered equal
    pub delta: Decimal,
}

impl ToleratedDelta {
    /// Check if this entry applies to every table
    pub fn is_wildcard(&self) -> bool {
        self.table == ANY_TABLE
    }

    fn matches_column(&self, column: &str) -> bool {
        self.column.eq_ignore_ascii_case(column)
    }
}

/// Tolerances consulted when resolving NUMERIC/DECIMAL columns
///
/// Lookup prefers an exact table match over a wildcard entry; among entries
/// of equal specificity the first registered wins.
#[derive(Debug, Clone, Default)]
pub struct ToleranceTable {
    entries: Vec<ToleratedDelta>,
}

impl ToleranceTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tolerance
    pub fn add_tolerance(
        &mut self,
        table_pattern: impl Into<String>,
        column: impl Into<String>,
        delta: Decimal,
    ) -> Result<(), ConfigurationError> {
        let table = table_pattern.into();
        let column = column.into();

        if column.trim().is_empty() {
            return Err(ConfigurationError::EmptyColumn { table });
        }
        if delta.is_sign_negative() && !delta.is_zero() {
            return Err(ConfigurationError::NegativeDelta { table, column, delta });
        }

        tracing::debug!(%table, %column, %delta, "registered tolerated delta");
        self.entries.push(ToleratedDelta { table, column, delta });
        Ok(())
    }

    /// Find the entry that applies to a table column
    pub fn find_tolerated_delta(&self, table: &str, column: &str) -> Option<&ToleratedDelta> {
        self.entries
            .iter()
            .find(|e| !e.is_wildcard() && e.table.eq_ignore_ascii_case(table) && e.matches_column(column))
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.is_wildcard() && e.matches_column(column))
            })
    }

    /// Find the delta that applies to a table column
    pub fn find_tolerance(&self, table: &str, column: &str) -> Option<Decimal> {
        self.find_tolerated_delta(table, column).map(|e| e.delta)
    }

    /// Iterate entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ToleratedDelta> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no tolerance is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn exact_match_beats_wildcard() {
        let mut table = ToleranceTable::new();
        table.add_tolerance(ANY_TABLE, "total", dec("0.5")).unwrap();
        table.add_tolerance("ORDERS", "TOTAL", dec("0.01")).unwrap();

        assert_eq!(table.find_tolerance("orders", "Total"), Some(dec("0.01")));
        assert_eq!(table.find_tolerance("INVOICES", "TOTAL"), Some(dec("0.5")));
        assert_eq!(table.find_tolerance("ORDERS", "PRICE"), None);
    }

    #[test]
    fn first_registered_wins() {
        let mut table = ToleranceTable::new();
        table.add_tolerance("T", "C", dec("1")).unwrap();
        table.add_tolerance("t", "c", dec("2")).unwrap();
        assert_eq!(table.find_tolerance("T", "C"), Some(dec("1")));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn negative_delta_is_rejected() {
        let mut table = ToleranceTable::new();
        let err = table.add_tolerance("T", "C", dec("-0.1")).unwrap_err();
        assert!(matches!(err, ConfigurationError::NegativeDelta { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn zero_delta_is_allowed() {
        let mut table = ToleranceTable::new();
        table.add_tolerance("T", "C", Decimal::ZERO).unwrap();
        assert_eq!(table.find_tolerance("T", "C"), Some(Decimal::ZERO));
    }

    #[test]
    fn empty_column_is_rejected() {
        let mut table = ToleranceTable::new();
        assert!(matches!(
            table.add_tolerance("T", " ", dec("1")),
            Err(ConfigurationError::EmptyColumn { .. })
        ));
    }
}
