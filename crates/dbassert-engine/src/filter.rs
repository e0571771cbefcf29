//! Column filters
//!
//! Filters decide which expected columns take part in a comparison. A filter
//! that rejects a column removes it from both sides.

use dbassert_core::ColumnRules;

/// Predicate over `(table, column)`
pub trait ColumnFilter: Send + Sync {
    /// Whether the column is compared
    fn accept(&self, table: &str, column: &str) -> bool;
}

impl<F> ColumnFilter for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn accept(&self, table: &str, column: &str) -> bool {
        self(table, column)
    }
}

/// Include/exclude filter over column name patterns
///
/// Patterns use `*` and `?` and match case-insensitively. A pattern
/// containing a dot is matched against `table.column`, otherwise against the
/// column name alone. Excludes win over includes; with no include pattern
/// every column not excluded is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternColumnFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PatternColumnFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured rules
    pub fn from_rules(rules: &ColumnRules) -> Self {
        Self {
            include: rules.include.clone(),
            exclude: rules.exclude.clone(),
        }
    }

    /// Add an include pattern
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    /// Add an exclude pattern
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Check if the filter accepts everything
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    fn matches(pattern: &str, table: &str, column: &str) -> bool {
        if pattern.contains('.') {
            wildcard_match(pattern, &format!("{}.{}", table, column))
        } else {
            wildcard_match(pattern, column)
        }
    }
}

impl ColumnFilter for PatternColumnFilter {
    fn accept(&self, table: &str, column: &str) -> bool {
        if self.exclude.iter().any(|p| Self::matches(p, table, column)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| Self::matches(p, table, column))
    }
}

/// Case-insensitive wildcard matching (`*` any run, `?` one character)
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let text: Vec<char> = text.to_lowercase().chars().collect();

    let (mut p, mut t) = (0, 0);
    // Last `*` seen and the text position it currently covers up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star, covered)) = backtrack {
            p = star + 1;
            t = covered + 1;
            backtrack = Some((star, covered + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
