//! Single-column stable sort.
use crate::core::types::{Row, SortDirection, compare_values};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The one active sort column and its direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Asc)
    }

    /// Sort state after the user asks to sort by `column`: the active
    /// ascending column flips to descending, anything else starts ascending.
    pub fn requested(current: Option<&SortState>, column: &str) -> Self {
        match current {
            Some(s) if s.column == column && s.direction == SortDirection::Asc => {
                Self::new(column, SortDirection::Desc)
            }
            _ => Self::ascending(column),
        }
    }
}

impl Display for SortState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.column, self.direction)
    }
}

/// Sort rows in place by the raw value of the sort column.
///
/// Uses a stable sort, so rows with equal keys keep their relative order in
/// both directions. No sort state leaves the order untouched.
pub fn sort_rows(rows: &mut [&Row], sort: Option<&SortState>) {
    let Some(sort) = sort else { return };
    rows.sort_by(|a, b| {
        let ord = compare_values(a.get(&sort.column), b.get(&sort.column));
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}
