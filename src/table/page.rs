//! Fixed-size pagination over the filtered, sorted rows.
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 1-based page index plus a fixed page size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub index: usize,
    pub size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            index: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageState {
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }

    pub fn first(size: usize) -> Self {
        Self::new(1, size)
    }

    /// Page size never drops below one row
    pub fn effective_size(&self) -> usize {
        self.size.max(1)
    }

    /// Number of pages for `count` rows; an empty set still has one page
    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.effective_size()).max(1)
    }

    /// Page index clamped into `[1, total_pages]`
    pub fn clamped_index(&self, count: usize) -> usize {
        self.index.clamp(1, self.total_pages(count))
    }

    /// Slice bounds of the (clamped) page within `count` rows
    pub fn window(&self, count: usize) -> Range<usize> {
        let size = self.effective_size();
        let start = ((self.clamped_index(count) - 1) * size).min(count);
        let end = (start + size).min(count);
        start..end
    }
}

/// Page numbers offered as direct jump targets: the first `max_buttons` pages
pub fn page_buttons(total_pages: usize, max_buttons: usize) -> Vec<usize> {
    (1..=total_pages.min(max_buttons)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page = PageState::default();
        assert_eq!(page.total_pages(0), 1);
        assert_eq!(page.total_pages(1), 1);
        assert_eq!(page.total_pages(10), 1);
        assert_eq!(page.total_pages(11), 2);
        assert_eq!(page.total_pages(25), 3);
    }

    #[test]
    fn test_window_and_clamp() {
        assert_eq!(PageState::new(1, 10).window(25), 0..10);
        assert_eq!(PageState::new(3, 10).window(25), 20..25);
        // Past the end clamps to the last page
        assert_eq!(PageState::new(9, 10).window(25), 20..25);
        // Zero clamps to the first page
        assert_eq!(PageState::new(0, 10).window(25), 0..10);
        assert_eq!(PageState::new(4, 10).window(0), 0..0);
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let page = PageState::new(2, 0);
        assert_eq!(page.total_pages(3), 3);
        assert_eq!(page.window(3), 1..2);
    }

    #[test]
    fn test_page_buttons() {
        assert_eq!(page_buttons(1, 5), vec![1]);
        assert_eq!(page_buttons(3, 5), vec![1, 2, 3]);
        assert_eq!(page_buttons(12, 5), vec![1, 2, 3, 4, 5]);
    }
}
