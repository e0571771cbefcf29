//! dbassert diff engine
//!
//! Compares expected and actual tables or datasets and reports every
//! structural and cell mismatch.

pub mod assertion;
pub mod diff;
pub mod error;
pub mod filter;

pub use assertion::DbAssertion;
pub use diff::DiffEngine;
pub use error::DiffError;
pub use filter::{wildcard_match, ColumnFilter, PatternColumnFilter};
