//! Presentation binding.
//!
//! [`PageView`] is a frontend-agnostic snapshot of what a table should show
//! right now: header cells with sort indicators, the current page's rendered
//! rows with their selection state, and a pagination summary. A GUI draws it
//! however it likes; [`PageView::to_text`] lays it out as a plain text grid.

use std::fmt;

use unicode_width::UnicodeWidthStr;

use crate::selection::SelectionMode;
use crate::table::SortDirection;

/// Gap between text columns.
const COLUMN_GAP: &str = "  ";

/// A column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub header: String,
    pub sortable: bool,
    pub direction: SortDirection,
}

impl HeaderCell {
    /// Header text with the sort indicator appended.
    pub fn label(&self) -> String {
        match self.direction {
            SortDirection::None => self.header.clone(),
            direction => format!("{} {}", self.header, direction.indicator()),
        }
    }
}

/// One rendered row of the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView<K> {
    pub key: K,
    pub selected: bool,
    /// Display text per column, in column order.
    pub cells: Vec<String>,
}

/// Pagination summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    /// Rows passing the global filter.
    pub filtered_count: usize,
    /// Rows in the dataset.
    pub total_count: usize,
    pub can_previous: bool,
    pub can_next: bool,
}

/// Everything needed to draw the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<K> {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RowView<K>>,
    pub page: PageInfo,
    pub selection_mode: SelectionMode,
    /// Every filtered row is selected.
    pub all_selected: bool,
    /// Some rows are selected, but not every filtered row (indeterminate).
    pub some_selected: bool,
}

impl<K> PageView<K> {
    /// Lay the page out as a fixed-width text grid.
    ///
    /// Widths are measured in terminal columns, so accented and wide
    /// characters line up.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.label().width()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(&row.cells) {
                *width = (*width).max(cell.width());
            }
        }

        let marker_column = self.selection_mode != SelectionMode::None;
        let mut lines = Vec::with_capacity(self.rows.len() + 3);

        let mut header: Vec<String> = Vec::with_capacity(widths.len() + 1);
        if marker_column {
            header.push(self.header_marker().to_string());
        }
        header.extend(
            self.headers
                .iter()
                .zip(&widths)
                .map(|(h, &w)| pad(&h.label(), w)),
        );
        lines.push(header.join(COLUMN_GAP).trim_end().to_string());

        let content_width = widths.iter().sum::<usize>()
            + COLUMN_GAP.len() * widths.len().saturating_sub(1)
            + if marker_column { 3 + COLUMN_GAP.len() } else { 0 };
        lines.push("─".repeat(content_width));

        if self.rows.is_empty() {
            lines.push("(no rows)".to_string());
        }
        for row in &self.rows {
            let mut cells: Vec<String> = Vec::with_capacity(widths.len() + 1);
            if marker_column {
                cells.push(self.row_marker(row.selected).to_string());
            }
            cells.extend(row.cells.iter().zip(&widths).map(|(c, &w)| pad(c, w)));
            lines.push(cells.join(COLUMN_GAP).trim_end().to_string());
        }

        lines.push(self.footer());
        lines.join("\n")
    }

    fn header_marker(&self) -> &'static str {
        match self.selection_mode {
            SelectionMode::Multi if self.all_selected => "[x]",
            SelectionMode::Multi if self.some_selected => "[-]",
            SelectionMode::Multi => "[ ]",
            _ => "   ",
        }
    }

    fn row_marker(&self, selected: bool) -> &'static str {
        match (self.selection_mode, selected) {
            (SelectionMode::Single, true) => "(*)",
            (SelectionMode::Single, false) => "( )",
            (_, true) => "[x]",
            (_, false) => "[ ]",
        }
    }

    fn footer(&self) -> String {
        let page = &self.page;
        let mut footer = format!(
            "Page {} of {} · {} rows",
            page.page_index + 1,
            page.page_count.max(1),
            page.filtered_count
        );
        if page.filtered_count != page.total_count {
            footer.push_str(&format!(" (filtered from {})", page.total_count));
        }
        footer
    }
}

impl<K> fmt::Display for PageView<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Right-pad `text` with spaces to `width` terminal columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}
