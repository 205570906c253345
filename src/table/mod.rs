//! Table engine: filter, then sort, then paginate a schema-less row set.
//!
//! The engine is a pure projection. Callers own a [`TableState`], mutate it
//! through [`TableAction`]s and ask for a fresh [`TableView`] after every
//! change. Nothing here panics on out-of-range input; page indices are
//! clamped.
pub mod filter;
pub mod page;
pub mod sort;

pub use filter::FilterState;
pub use page::{DEFAULT_PAGE_SIZE, PageState, page_buttons};
pub use sort::{SortState, sort_rows};

use crate::core::types::{Row, SortDirection, cell_display};
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;

/// Header cell of the rendered table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    pub name: String,
    /// Direction when this column carries the active sort
    pub sort: Option<SortDirection>,
    /// Filter pattern currently typed for this column
    pub filter: String,
}

/// One rendered page of the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView<'a> {
    pub columns: Vec<ColumnHeader>,
    pub visible_rows: Vec<&'a Row>,
    pub total_filtered_count: usize,
    pub total_pages: usize,
    /// Page index actually shown, after clamping
    pub page_index: usize,
    /// 1-based position of the first visible row, 0 when nothing is shown
    pub first_row: usize,
    /// 1-based position of the last visible row, 0 when nothing is shown
    pub last_row: usize,
    pub filters_active: bool,
}

impl TableView<'_> {
    /// Visible rows as display strings in column order
    pub fn cells(&self) -> Vec<Vec<String>> {
        self.visible_rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| cell_display(row, &c.name))
                    .collect()
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.visible_rows.is_empty()
    }

    /// Caption describing the visible window, e.g. "Showing 11 to 20 of 42 records"
    pub fn caption(&self) -> String {
        format!(
            "Showing {} to {} of {} records",
            self.first_row, self.last_row, self.total_filtered_count
        )
    }
}

/// Filtered and sorted rows, before pagination
pub fn arrange<'a>(rows: &'a [Row], filters: &FilterState, sort: Option<&SortState>) -> Vec<&'a Row> {
    let mut arranged = filters.apply(rows);
    sort_rows(&mut arranged, sort);
    arranged
}

/// Project `rows` through filters, sort and page.
pub fn view<'a>(
    rows: &'a [Row],
    columns: &[String],
    filters: &FilterState,
    sort: Option<&SortState>,
    page: PageState,
) -> TableView<'a> {
    let arranged = arrange(rows, filters, sort);
    let total = arranged.len();
    let window = page.window(total);
    let (first_row, last_row) = if window.is_empty() {
        (0, 0)
    } else {
        (window.start + 1, window.end)
    };
    debug!(
        rows = rows.len(),
        filtered = total,
        page = page.clamped_index(total),
        "table view recomputed"
    );

    let headers = columns
        .iter()
        .map(|name| ColumnHeader {
            name: name.clone(),
            sort: sort.filter(|s| &s.column == name).map(|s| s.direction),
            filter: filters.pattern(name).to_string(),
        })
        .collect();

    TableView {
        columns: headers,
        visible_rows: arranged[window].to_vec(),
        total_filtered_count: total,
        total_pages: page.total_pages(total),
        page_index: page.clamped_index(total),
        first_row,
        last_row,
        filters_active: filters.is_active(),
    }
}

/// Interactions that change the table state
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum TableAction {
    /// Type a filter pattern for a column (empty clears it)
    SetFilter { column: String, pattern: String },
    ClearFilters,
    /// Click a column header
    RequestSort(String),
    SetSort(SortState),
    ClearSort,
    NextPage,
    PrevPage,
    GoToPage(usize),
}

/// Filter, sort and page state owned by whoever presents the table.
///
/// Must be reset whenever the underlying rows are replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    pub filters: FilterState,
    pub sort: Option<SortState>,
    pub page: PageState,
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            filters: FilterState::new(),
            sort: None,
            page: PageState::first(page_size),
        }
    }

    /// Back to defaults, keeping the page size
    pub fn reset(&mut self) {
        *self = Self::with_page_size(self.page.size);
    }

    /// Apply an action. `rows` is the row set the state refers to; it bounds
    /// page navigation.
    pub fn update(&mut self, action: TableAction, rows: &[Row]) {
        debug!("table action: {action}");
        match action {
            TableAction::SetFilter { column, pattern } => {
                self.filters.set(column, pattern);
                self.page.index = 1;
            }
            TableAction::ClearFilters => {
                self.filters.clear();
                self.page.index = 1;
            }
            TableAction::RequestSort(column) => {
                self.sort = Some(SortState::requested(self.sort.as_ref(), &column));
            }
            TableAction::SetSort(sort) => self.sort = Some(sort),
            TableAction::ClearSort => self.sort = None,
            TableAction::NextPage => {
                let total = self.total_pages(rows);
                self.page.index = (self.page.clamped_index(self.filtered_count(rows)) + 1).min(total);
            }
            TableAction::PrevPage => {
                let current = self.page.clamped_index(self.filtered_count(rows));
                self.page.index = current.saturating_sub(1).max(1);
            }
            TableAction::GoToPage(index) => {
                self.page.index = index.clamp(1, self.total_pages(rows));
            }
        }
    }

    pub fn filtered_count(&self, rows: &[Row]) -> usize {
        if self.filters.is_active() {
            rows.iter().filter(|r| self.filters.matches(r)).count()
        } else {
            rows.len()
        }
    }

    pub fn total_pages(&self, rows: &[Row]) -> usize {
        self.page.total_pages(self.filtered_count(rows))
    }

    pub fn view<'a>(&self, rows: &'a [Row], columns: &[String]) -> TableView<'a> {
        view(rows, columns, &self.filters, self.sort.as_ref(), self.page)
    }
}
