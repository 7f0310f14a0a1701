//! Table - the tabular view engine.
//!
//! A [`Table`] holds a column schema, a row dataset and the view state on top
//! of them: global filter, single-column sort, pagination and row selection.
//! Every intent is a synchronous `&mut self` call that leaves the table in a
//! consistent state; none of them fail. Out-of-range input is clamped or
//! ignored.
//!
//! The derived row model (filtered, then sorted, as indices into the dataset)
//! is recomputed eagerly whenever the dataset, the filter or the sort changes,
//! so reads such as [`Table::visible_rows`] are cheap slices over it.

mod model;
mod pagination;

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, warn};

use crate::column::{Column, TableRow};
use crate::config::{ConfigError, RefreshConfig, TableConfig};
use crate::events::{RefreshHandler, TableHandlers};
use crate::refresh::RefreshTimer;
use crate::render::{HeaderCell, PageInfo, PageView, RowView};
use crate::selection::{Selection, SelectionMode, SelectionState};

pub use model::{SortDirection, SortState};
use pagination::Pagination;

// =============================================================================
// Table
// =============================================================================

/// A filterable, sortable, paginated and selectable view over a dataset.
pub struct Table<R: TableRow> {
    /// Column definitions.
    columns: Vec<Column<R>>,
    /// The dataset, in caller order.
    rows: Vec<R>,
    /// Filtered and sorted positions into `rows`.
    row_model: Vec<usize>,
    global_filter: String,
    sort: Option<SortState>,
    pagination: Pagination,
    selection: SelectionState<R::Key>,
    reset_page_on_filter: bool,
    refresh: RefreshConfig,
    /// Running auto-refresh task, cancelled on drop.
    refresh_timer: Option<RefreshTimer>,
    handlers: TableHandlers<R>,
}

impl<R: TableRow> Table<R> {
    /// Create a table with the default configuration.
    pub fn new(columns: Vec<Column<R>>, rows: Vec<R>) -> Self {
        Self::from_parts(columns, rows, TableConfig::default(), None, TableHandlers::default())
    }

    /// Start building a table with custom configuration and handlers.
    pub fn builder(columns: Vec<Column<R>>) -> TableBuilder<R> {
        TableBuilder::new(columns)
    }

    fn from_parts(
        columns: Vec<Column<R>>,
        rows: Vec<R>,
        config: TableConfig,
        controlled: Option<SelectionState<R::Key>>,
        handlers: TableHandlers<R>,
    ) -> Self {
        let selection = controlled
            .unwrap_or_else(|| SelectionState::Uncontrolled(Selection::new(config.selection)));
        let mut table = Self {
            columns,
            rows,
            row_model: Vec::new(),
            global_filter: String::new(),
            sort: None,
            pagination: Pagination::new(config.page_size, config.page_size_options),
            selection,
            reset_page_on_filter: config.reset_page_on_filter,
            refresh: config.refresh,
            refresh_timer: None,
            handlers,
        };
        table.rebuild_row_model();
        table.sync_refresh_timer();
        table
    }

    // -------------------------------------------------------------------------
    // Schema and dataset
    // -------------------------------------------------------------------------

    /// Get the column definitions.
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Find a column by id.
    pub fn column(&self, id: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    /// The full dataset in caller order.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Replace the dataset.
    ///
    /// Goes back to the first page if the row count changed; otherwise the
    /// page index is kept (and clamped). Selection is kept by key.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        let length_changed = rows.len() != self.rows.len();
        debug!("Dataset replaced: {} -> {} rows", self.rows.len(), rows.len());
        self.rows = rows;
        self.rebuild_row_model();
        if length_changed {
            self.pagination.reset();
        }
    }

    /// Find a row by key.
    pub fn row(&self, key: &R::Key) -> Option<&R> {
        self.rows.iter().find(|r| &r.key() == key)
    }

    fn rebuild_row_model(&mut self) {
        self.row_model = model::build_row_model(
            &self.rows,
            &self.columns,
            &self.global_filter,
            self.sort.as_ref(),
        );
        self.pagination.clamp(self.row_model.len());
    }

    // -------------------------------------------------------------------------
    // Filter
    // -------------------------------------------------------------------------

    /// Replace the global filter query.
    ///
    /// The page index is clamped to the new page count, or reset to 0 when
    /// the table is configured with `reset_page_on_filter`.
    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.global_filter {
            return;
        }
        debug!("Global filter set to {:?}", text);
        self.global_filter = text;
        self.rebuild_row_model();
        if self.reset_page_on_filter {
            self.pagination.reset();
        }
    }

    /// The current global filter query.
    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    /// Number of rows passing the filter.
    pub fn filtered_count(&self) -> usize {
        self.row_model.len()
    }

    /// All rows passing the filter, in sorted order.
    pub fn filtered_rows(&self) -> impl Iterator<Item = &R> {
        self.row_model.iter().map(|&i| &self.rows[i])
    }

    fn filtered_keys(&self) -> Vec<R::Key> {
        self.filtered_rows().map(|r| r.key()).collect()
    }

    // -------------------------------------------------------------------------
    // Sort
    // -------------------------------------------------------------------------

    /// Advance a column through none → ascending → descending → none.
    ///
    /// Sorting a different column replaces the previous sort. Unknown and
    /// non-sortable columns are ignored.
    pub fn toggle_sort(&mut self, column_id: &str) {
        match self.column(column_id) {
            Some(column) if column.is_sortable() => {}
            Some(_) => {
                debug!("Column {:?} is not sortable", column_id);
                return;
            }
            None => {
                debug!("Unknown sort column {:?}", column_id);
                return;
            }
        }

        let direction = self.sort_direction(column_id).next();
        self.sort = match direction {
            SortDirection::None => None,
            direction => Some(SortState {
                column: column_id.to_string(),
                direction,
            }),
        };
        debug!("Sort on {:?} is now {:?}", column_id, direction);
        self.rebuild_row_model();
    }

    /// The active sort, if any.
    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// The sort descriptor list. Holds at most one entry.
    pub fn sort_descriptors(&self) -> Vec<(String, SortDirection)> {
        self.sort
            .iter()
            .map(|s| (s.column.clone(), s.direction))
            .collect()
    }

    /// Sort direction shown on a column's header.
    pub fn sort_direction(&self, column_id: &str) -> SortDirection {
        match &self.sort {
            Some(sort) if sort.column == column_id => sort.direction,
            _ => SortDirection::None,
        }
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn page_index(&self) -> usize {
        self.pagination.page_index()
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    pub fn page_size_options(&self) -> &[usize] {
        self.pagination.options()
    }

    /// Number of pages; zero when no rows pass the filter.
    pub fn page_count(&self) -> usize {
        self.pagination.page_count(self.row_model.len())
    }

    /// Go to page `index`, clamped to the last page.
    pub fn set_page_index(&mut self, index: usize) {
        self.pagination.set_index(index, self.row_model.len());
    }

    pub fn can_next_page(&self) -> bool {
        self.pagination.can_next(self.row_model.len())
    }

    pub fn can_previous_page(&self) -> bool {
        self.pagination.can_previous()
    }

    /// Next page; no-op on the last page.
    pub fn next_page(&mut self) {
        self.pagination.next(self.row_model.len());
    }

    /// Previous page; no-op on the first page.
    pub fn previous_page(&mut self) {
        self.pagination.previous();
    }

    /// Switch page size and go back to the first page.
    ///
    /// Sizes that are not among the configured options are ignored.
    pub fn set_page_size(&mut self, size: usize) {
        if !self.pagination.set_size(size) {
            warn!(
                "Ignoring page size {} (options: {:?})",
                size,
                self.pagination.options()
            );
        }
    }

    /// Rows on the current page, after filter and sort.
    ///
    /// Recomputed from the current state on every call.
    pub fn visible_rows(&self) -> impl Iterator<Item = &R> {
        let range = self.pagination.range(self.row_model.len());
        self.row_model[range].iter().map(|&i| &self.rows[i])
    }

    /// Pagination summary for the current state.
    pub fn page_info(&self) -> PageInfo {
        let total = self.row_model.len();
        PageInfo {
            page_index: self.pagination.page_index(),
            page_count: self.pagination.page_count(total),
            page_size: self.pagination.page_size(),
            page_size_options: self.pagination.options().to_vec(),
            filtered_count: total,
            total_count: self.rows.len(),
            can_previous: self.pagination.can_previous(),
            can_next: self.pagination.can_next(total),
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.current().mode
    }

    /// Whether the selection is owned by the caller.
    pub fn is_selection_controlled(&self) -> bool {
        self.selection.is_controlled()
    }

    /// Flip selection for one row key.
    ///
    /// Keys need not belong to a current row; they are recorded as given.
    pub fn toggle_row_selected(&mut self, key: R::Key) {
        if self.selection.apply(|s| s.toggle(key)) {
            self.notify_selection_changed();
        }
    }

    /// Select every row matching the current filter, or deselect them all if
    /// they are already all selected.
    ///
    /// Works on the whole filtered set, not only the visible page. Selected
    /// rows outside the filter are left alone either way.
    pub fn toggle_all_rows_selected(&mut self) {
        let keys = self.filtered_keys();
        if self.selection.apply(|s| s.toggle_all(&keys)) {
            self.notify_selection_changed();
        }
    }

    /// Adopt a new full selection from the caller.
    ///
    /// In controlled mode this is how the owner hands back the state it
    /// accepted from the change callback.
    pub fn sync_selection(&mut self, keys: HashSet<R::Key>) {
        self.selection.sync(keys);
    }

    pub fn is_row_selected(&self, key: &R::Key) -> bool {
        self.selection.current().is_selected(key)
    }

    /// Every row matching the filter is selected (and there is at least one).
    pub fn is_all_selected(&self) -> bool {
        self.selection.current().covers(&self.filtered_keys())
    }

    /// Something is selected but not every filtered row; the indeterminate
    /// state of a select-all checkbox.
    pub fn is_some_selected(&self) -> bool {
        !self.selection.current().is_empty() && !self.is_all_selected()
    }

    /// All selected keys, including keys not in the dataset.
    pub fn selected_keys(&self) -> &HashSet<R::Key> {
        &self.selection.current().selected
    }

    /// Selected rows present in the dataset, in dataset order.
    pub fn selected_rows(&self) -> impl Iterator<Item = &R> {
        let selection = self.selection.current();
        self.rows.iter().filter(move |r| selection.is_selected(&r.key()))
    }

    fn notify_selection_changed(&mut self) {
        // Controlled owners already got the new state from their callback
        if let SelectionState::Uncontrolled(selection) = &self.selection {
            self.handlers.selection_changed(&selection.selected);
        }
    }

    // -------------------------------------------------------------------------
    // Row click and refresh
    // -------------------------------------------------------------------------

    /// Report a click on a row. Returns true if a row-click handler ran.
    pub fn click_row(&mut self, key: &R::Key) -> bool {
        match self.rows.iter().find(|r| &r.key() == key) {
            Some(row) => self.handlers.row_clicked(row),
            None => {
                debug!("Click on unknown row {:?}", key);
                false
            }
        }
    }

    /// Ask the owner to re-fetch the data now. Returns true if a refresh
    /// handler ran.
    pub fn request_refresh(&self) -> bool {
        self.handlers.refresh_requested()
    }

    /// Turn the auto-refresh timer on or off.
    ///
    /// Enabling requires a refresh handler and a running tokio runtime;
    /// without them the table stays idle.
    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.refresh.enabled = enabled;
        self.sync_refresh_timer();
    }

    /// Change the auto-refresh interval. Zero is ignored.
    pub fn set_refresh_interval_secs(&mut self, secs: u64) {
        if secs == 0 {
            warn!("Ignoring zero refresh interval");
            return;
        }
        self.refresh.interval_secs = secs;
        self.sync_refresh_timer();
    }

    /// Whether an auto-refresh timer is currently running.
    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh_timer.as_ref().is_some_and(RefreshTimer::is_running)
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh.interval()
    }

    /// Start, restart or stop the timer to match the refresh settings.
    fn sync_refresh_timer(&mut self) {
        if !self.refresh.enabled {
            if self.refresh_timer.take().is_some() {
                debug!("Auto-refresh disabled");
            }
            return;
        }

        let interval = self.refresh.interval();
        if self.refresh_timer.as_ref().is_some_and(|t| t.interval() == interval) {
            return;
        }

        // Never run two timers at once
        self.refresh_timer = None;
        match self.handlers.refresh_handler() {
            Some(handler) => self.refresh_timer = RefreshTimer::start(interval, handler),
            None => debug!("Auto-refresh enabled without a refresh handler"),
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Snapshot of the current page for drawing.
    ///
    /// Calls every column's accessor and renderer for the visible rows; a
    /// panicking accessor propagates, so wrap this in a
    /// [`FaultBoundary`](crate::FaultBoundary).
    pub fn render(&self) -> PageView<R::Key> {
        let headers = self
            .columns
            .iter()
            .map(|c| HeaderCell {
                id: c.id().to_string(),
                header: c.header().to_string(),
                sortable: c.is_sortable(),
                direction: self.sort_direction(c.id()),
            })
            .collect();

        let rows = self
            .visible_rows()
            .map(|row| {
                let key = row.key();
                RowView {
                    selected: self.is_row_selected(&key),
                    cells: self.columns.iter().map(|c| c.display(row)).collect(),
                    key,
                }
            })
            .collect();

        PageView {
            headers,
            rows,
            page: self.page_info(),
            selection_mode: self.selection_mode(),
            all_selected: self.is_all_selected(),
            some_selected: self.is_some_selected(),
        }
    }
}

impl<R: TableRow> std::fmt::Debug for Table<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("filtered", &self.row_model.len())
            .field("global_filter", &self.global_filter)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .field("selection", &self.selection)
            .field("refresh_timer", &self.refresh_timer)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// TableBuilder
// =============================================================================

/// Builder for a [`Table`] with custom configuration and handlers.
///
/// # Example
///
/// ```
/// use datagrid::{CellValue, Column, SelectionMode, Table, TableConfig, TableRow};
///
/// struct Clearance {
///     id: u32,
///     employee: String,
/// }
///
/// impl TableRow for Clearance {
///     type Key = u32;
///     fn key(&self) -> u32 {
///         self.id
///     }
/// }
///
/// let table = Table::builder(vec![Column::new("employee", "Empleado", |c: &Clearance| {
///     CellValue::from(c.employee.as_str())
/// })])
/// .rows(vec![Clearance { id: 1, employee: "Ana".into() }])
/// .config(TableConfig::default().with_selection(SelectionMode::Multi))
/// .on_row_click(|c| println!("open clearance {}", c.id))
/// .build()
/// .unwrap();
///
/// assert_eq!(table.filtered_count(), 1);
/// ```
pub struct TableBuilder<R: TableRow> {
    columns: Vec<Column<R>>,
    rows: Vec<R>,
    config: TableConfig,
    controlled: Option<(HashSet<R::Key>, Box<dyn FnMut(&HashSet<R::Key>)>)>,
    handlers: TableHandlers<R>,
}

impl<R: TableRow> TableBuilder<R> {
    /// Create a builder with the given columns and default configuration.
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            config: TableConfig::default(),
            controlled: None,
            handlers: TableHandlers::default(),
        }
    }

    /// Set the initial dataset.
    pub fn rows(mut self, rows: Vec<R>) -> Self {
        self.rows = rows;
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Let the caller own the selection.
    ///
    /// `on_change` receives the next full selection for every intent. The
    /// table's view only changes once the caller passes it back through
    /// [`Table::sync_selection`].
    pub fn controlled_selection<F>(mut self, selected: HashSet<R::Key>, on_change: F) -> Self
    where
        F: FnMut(&HashSet<R::Key>) + 'static,
    {
        self.controlled = Some((selected, Box::new(on_change)));
        self
    }

    /// Be notified of selection changes in uncontrolled mode.
    pub fn on_selection_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&HashSet<R::Key>) + 'static,
    {
        self.handlers.on_selection_change = Some(Box::new(handler));
        self
    }

    /// Be notified of row clicks.
    pub fn on_row_click<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&R) + 'static,
    {
        self.handlers.on_row_click = Some(Box::new(handler));
        self
    }

    /// Set the refresh handler used by manual and automatic refresh.
    pub fn on_refresh<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: RefreshHandler = std::sync::Arc::new(handler);
        self.handlers.on_refresh = Some(handler);
        self
    }

    /// Validate the configuration and build the table.
    ///
    /// Starts the auto-refresh timer if it is enabled in the configuration
    /// and a refresh handler was given.
    pub fn build(self) -> Result<Table<R>, ConfigError> {
        self.config.validate()?;

        let mode = self.config.selection;
        let controlled = self.controlled.map(|(selected, on_change)| SelectionState::Controlled {
            snapshot: Selection::with_selected(mode, selected),
            on_change,
        });
        Ok(Table::from_parts(
            self.columns,
            self.rows,
            self.config,
            controlled,
            self.handlers,
        ))
    }
}

impl<R: TableRow> std::fmt::Debug for TableBuilder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableBuilder")
            .field("columns", &self.columns)
            .field("rows", &self.rows.len())
            .field("config", &self.config)
            .field("controlled", &self.controlled.is_some())
            .field("handlers", &self.handlers)
            .finish()
    }
}
