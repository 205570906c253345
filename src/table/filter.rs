//! Per-column substring filters.
use crate::core::types::{Row, cell_display};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column name to case-insensitive substring pattern.
///
/// A row passes when it contains every non-empty pattern in its column
/// (AND across columns). Empty patterns are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    patterns: BTreeMap<String, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pattern for a column; an empty pattern removes the filter
    pub fn set(&mut self, column: impl Into<String>, pattern: impl Into<String>) {
        let column = column.into();
        let pattern = pattern.into();
        if pattern.is_empty() {
            self.patterns.remove(&column);
        } else {
            self.patterns.insert(column, pattern);
        }
    }

    pub fn clear(&mut self) {
        self.patterns.clear();
    }

    /// Pattern currently applied to a column, empty when none
    pub fn pattern(&self, column: &str) -> &str {
        self.patterns.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn is_active(&self) -> bool {
        !self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.patterns.iter().map(|(c, p)| (c.as_str(), p.as_str()))
    }

    /// Evaluate the filters against a single row
    pub fn matches(&self, row: &Row) -> bool {
        self.patterns.iter().all(|(column, pattern)| {
            cell_display(row, column)
                .to_lowercase()
                .contains(&pattern.to_lowercase())
        })
    }

    /// Rows passing every active filter, in their original order
    pub fn apply<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        if !self.is_active() {
            return rows.iter().collect();
        }
        let lowered: Vec<(&str, String)> = self
            .patterns
            .iter()
            .map(|(c, p)| (c.as_str(), p.to_lowercase()))
            .collect();
        rows.iter()
            .filter(|row| {
                lowered
                    .iter()
                    .all(|(column, pattern)| cell_display(row, column).to_lowercase().contains(pattern))
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FilterState {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = Self::new();
        for (column, pattern) in iter {
            state.set(column, pattern);
        }
        state
    }
}
