//! Events a table emits to its owner.
//!
//! The table never talks to the outside world directly. Whatever the caller
//! needs to react to (a changed selection, a clicked row, a refresh request)
//! goes through the optional callbacks held in [`TableHandlers`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::column::TableRow;

/// Identifies which handler an event is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    /// Selection changed; carries the new full set of selected keys.
    SelectionChange,
    /// A row was clicked; carries the underlying record.
    RowClick,
    /// The data should be fetched again; no payload.
    RefreshRequested,
}

/// Called with the full set of selected keys after every change.
pub type SelectionChangeHandler<K> = Box<dyn FnMut(&HashSet<K>)>;

/// Called with the record of a clicked row.
pub type RowClickHandler<R> = Box<dyn FnMut(&R)>;

/// Called when the data should be refreshed.
///
/// Must be `Send + Sync` because the auto-refresh timer fires it from the
/// async runtime.
pub type RefreshHandler = Arc<dyn Fn() + Send + Sync>;

/// Optional event callbacks for a table.
pub struct TableHandlers<R: TableRow> {
    pub on_selection_change: Option<SelectionChangeHandler<R::Key>>,
    pub on_row_click: Option<RowClickHandler<R>>,
    pub on_refresh: Option<RefreshHandler>,
}

impl<R: TableRow> Default for TableHandlers<R> {
    fn default() -> Self {
        Self {
            on_selection_change: None,
            on_row_click: None,
            on_refresh: None,
        }
    }
}

impl<R: TableRow> TableHandlers<R> {
    /// Check whether a handler is registered for the event.
    pub fn has(&self, event: TableEvent) -> bool {
        match event {
            TableEvent::SelectionChange => self.on_selection_change.is_some(),
            TableEvent::RowClick => self.on_row_click.is_some(),
            TableEvent::RefreshRequested => self.on_refresh.is_some(),
        }
    }

    /// Dispatch a selection change. Returns true if a handler ran.
    pub fn selection_changed(&mut self, keys: &HashSet<R::Key>) -> bool {
        trace!("dispatching {:?} ({} selected)", TableEvent::SelectionChange, keys.len());
        match self.on_selection_change.as_mut() {
            Some(handler) => {
                handler(keys);
                true
            }
            None => false,
        }
    }

    /// Dispatch a row click. Returns true if a handler ran.
    pub fn row_clicked(&mut self, row: &R) -> bool {
        trace!("dispatching {:?} for {:?}", TableEvent::RowClick, row.key());
        match self.on_row_click.as_mut() {
            Some(handler) => {
                handler(row);
                true
            }
            None => false,
        }
    }

    /// Dispatch a refresh request. Returns true if a handler ran.
    pub fn refresh_requested(&self) -> bool {
        trace!("dispatching {:?}", TableEvent::RefreshRequested);
        match &self.on_refresh {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// A shareable handle to the refresh handler, for the timer task.
    pub fn refresh_handler(&self) -> Option<RefreshHandler> {
        self.on_refresh.clone()
    }
}

impl<R: TableRow> fmt::Debug for TableHandlers<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableHandlers")
            .field("on_selection_change", &self.has(TableEvent::SelectionChange))
            .field("on_row_click", &self.has(TableEvent::RowClick))
            .field("on_refresh", &self.has(TableEvent::RefreshRequested))
            .finish()
    }
}
