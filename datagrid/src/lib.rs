//! Tabular view engine.
//!
//! A small state container that turns a column schema and a row dataset into
//! a filterable, sortable, paginated and selectable grid. Rendering is left to
//! the caller: [`Table::render`] produces a [`PageView`] describing the current
//! page, which can be drawn by any frontend or laid out as text.
//!
//! # Example
//!
//! ```
//! use datagrid::{CellValue, Column, Table, TableRow};
//!
//! #[derive(Clone)]
//! struct Asset {
//!     id: u32,
//!     serial: String,
//! }
//!
//! impl TableRow for Asset {
//!     type Key = u32;
//!
//!     fn key(&self) -> u32 {
//!         self.id
//!     }
//! }
//!
//! let columns = vec![
//!     Column::new("serial", "Serial", |a: &Asset| CellValue::from(a.serial.as_str())).sortable(),
//! ];
//! let rows = vec![
//!     Asset { id: 1, serial: "LAP-002".into() },
//!     Asset { id: 2, serial: "LAP-001".into() },
//! ];
//!
//! let mut table = Table::new(columns, rows);
//! table.toggle_sort("serial");
//! let serials: Vec<_> = table.visible_rows().map(|a| a.serial.as_str()).collect();
//! assert_eq!(serials, ["LAP-001", "LAP-002"]);
//! ```

pub mod boundary;
pub mod column;
pub mod config;
pub mod events;
pub mod refresh;
pub mod render;
pub mod selection;
pub mod table;
pub mod value;

pub use boundary::{BoundaryOutcome, FaultBoundary, RenderFault};
pub use column::{Column, TableRow};
pub use config::{ConfigError, RefreshConfig, TableConfig};
pub use events::{TableEvent, TableHandlers};
pub use refresh::RefreshTimer;
pub use render::{HeaderCell, PageInfo, PageView, RowView};
pub use selection::{Selection, SelectionMode, SelectionState};
pub use table::{SortDirection, SortState, Table, TableBuilder};
pub use value::CellValue;
