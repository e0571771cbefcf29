//! Comparison results
//!
//! A `ComparisonResult` collects every mismatch found by one comparison call.
//! Nothing short-circuits: the result lists all discrepancies at once.

use crate::mismatch::{CellMismatch, Mismatch};
use serde::{Deserialize, Serialize};

/// Summary statistics for a comparison
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Number of tables compared
    pub tables_compared: usize,

    /// Number of cells compared
    pub cells_compared: usize,

    /// Number of structural mismatches
    pub structural: usize,

    /// Number of cell mismatches
    pub cells: usize,
}

/// Outcome of a table or dataset comparison
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Summary statistics
    pub summary: ComparisonSummary,

    /// All mismatches, in discovery order
    pub mismatches: Vec<Mismatch>,
}

/// A failed comparison turned into an error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{report}")]
pub struct AssertionFailure {
    /// Rendered failure text
    pub report: String,

    /// The underlying result
    pub result: ComparisonResult,
}

impl ComparisonResult {
    /// Create an empty (passing) result
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no mismatch was found
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Add a mismatch
    pub fn push(&mut self, mismatch: Mismatch) {
        if mismatch.is_structural() {
            self.summary.structural += 1;
        } else {
            self.summary.cells += 1;
        }
        self.mismatches.push(mismatch);
    }

    /// Record that a table pair was compared
    pub fn record_table(&mut self, cells_compared: usize) {
        self.summary.tables_compared += 1;
        self.summary.cells_compared += cells_compared;
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ComparisonResult) {
        self.summary.tables_compared += other.summary.tables_compared;
        self.summary.cells_compared += other.summary.cells_compared;
        for mismatch in other.mismatches {
            self.push(mismatch);
        }
    }

    /// Structural mismatches only
    pub fn structural_mismatches(&self) -> impl Iterator<Item = &Mismatch> {
        self.mismatches.iter().filter(|m| m.is_structural())
    }

    /// Cell mismatches only
    pub fn cell_mismatches(&self) -> impl Iterator<Item = &CellMismatch> {
        self.mismatches.iter().filter_map(|m| m.as_cell())
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert into `Ok(())` when passed, or an `AssertionFailure`
    pub fn into_result(self) -> Result<(), AssertionFailure> {
        if self.passed() {
            return Ok(());
        }
        Err(AssertionFailure {
            report: self.to_string(),
            result: self,
        })
    }
}

impl std::fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.passed() {
            return write!(
                f,
                "comparison passed ({} tables, {} cells)",
                self.summary.tables_compared, self.summary.cells_compared
            );
        }

        writeln!(
            f,
            "comparison failed: {} structural, {} cell mismatches",
            self.summary.structural, self.summary.cells
        )?;
        for mismatch in &self.mismatches {
            writeln!(f, "  {}", mismatch)?;
        }
        Ok(())
    }
}
