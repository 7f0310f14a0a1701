//! Pagination state.

use std::ops::Range;

/// Page index and page size over a row count supplied per call.
///
/// The page index is kept within `[0, page_count - 1]` (or 0 when there are
/// no rows) by clamping; nothing here fails on out-of-range input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pagination {
    page_index: usize,
    page_size: usize,
    options: Vec<usize>,
}

impl Pagination {
    pub(crate) fn new(page_size: usize, options: Vec<usize>) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            options,
        }
    }

    pub(crate) fn page_index(&self) -> usize {
        self.page_index
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size
    }

    pub(crate) fn options(&self) -> &[usize] {
        &self.options
    }

    /// Number of pages for `total` rows; zero rows means zero pages.
    pub(crate) fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size)
    }

    fn last_index(&self, total: usize) -> usize {
        self.page_count(total).saturating_sub(1)
    }

    /// Pull the page index back into range. Returns true if it moved.
    pub(crate) fn clamp(&mut self, total: usize) -> bool {
        let last = self.last_index(total);
        if self.page_index > last {
            self.page_index = last;
            return true;
        }
        false
    }

    pub(crate) fn reset(&mut self) {
        self.page_index = 0;
    }

    /// Go to page `index`, clamped. Returns true if the page changed.
    pub(crate) fn set_index(&mut self, index: usize, total: usize) -> bool {
        let target = index.min(self.last_index(total));
        let changed = target != self.page_index;
        self.page_index = target;
        changed
    }

    pub(crate) fn can_next(&self, total: usize) -> bool {
        self.page_index < self.last_index(total)
    }

    pub(crate) fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub(crate) fn next(&mut self, total: usize) -> bool {
        if !self.can_next(total) {
            return false;
        }
        self.page_index += 1;
        true
    }

    pub(crate) fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Switch to one of the enumerated page sizes and go back to the first
    /// page. Sizes that are not options are rejected.
    pub(crate) fn set_size(&mut self, size: usize) -> bool {
        if !self.options.contains(&size) {
            return false;
        }
        self.page_size = size;
        self.page_index = 0;
        true
    }

    /// Row-model positions covered by the current page.
    pub(crate) fn range(&self, total: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pagination() -> Pagination {
        Pagination::new(10, vec![10, 20, 50])
    }

    #[test]
    fn test_page_count() {
        let p = pagination();
        assert_eq!(p.page_count(0), 0);
        assert_eq!(p.page_count(1), 1);
        assert_eq!(p.page_count(10), 1);
        assert_eq!(p.page_count(25), 3);
    }

    #[test]
    fn test_set_index_clamps() {
        let mut p = pagination();
        assert!(p.set_index(999, 25));
        assert_eq!(p.page_index(), 2);
        assert!(!p.set_index(2, 25));
        // Zero rows clamps to 0 from anywhere
        assert!(p.set_index(5, 0));
        assert_eq!(p.page_index(), 0);
    }

    #[test]
    fn test_next_previous_boundaries() {
        let mut p = pagination();
        assert!(!p.previous());
        assert!(p.next(15));
        assert!(!p.next(15));
        assert_eq!(p.page_index(), 1);
        assert!(p.previous());
        assert_eq!(p.page_index(), 0);
    }

    #[test]
    fn test_range() {
        let mut p = pagination();
        assert_eq!(p.range(25), 0..10);
        p.set_index(2, 25);
        assert_eq!(p.range(25), 20..25);
        assert_eq!(p.range(0), 0..0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut p = pagination();
        p.set_index(4, 50);
        assert!(p.clamp(12));
        assert_eq!(p.page_index(), 1);
        assert!(!p.clamp(12));
    }

    #[test]
    fn test_set_size_rejects_unknown() {
        let mut p = pagination();
        p.set_index(2, 30);
        assert!(!p.set_size(15));
        assert_eq!(p.page_index(), 2);
        assert!(p.set_size(20));
        assert_eq!(p.page_size(), 20);
        assert_eq!(p.page_index(), 0);
    }
}
