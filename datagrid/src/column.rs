//! Column definitions and the row identity contract.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::value::CellValue;

// =============================================================================
// TableRow Trait
// =============================================================================

/// Trait for records that can be displayed in a [`Table`](crate::Table).
///
/// The key is the row's identity for selection. It must stay stable across
/// re-sorts, re-filters and dataset refreshes, so derive it from a record
/// field (a database id, a serial number) rather than the row's position.
///
/// # Example
///
/// ```
/// use datagrid::TableRow;
///
/// #[derive(Clone)]
/// struct Ticket {
///     number: u64,
///     subject: String,
/// }
///
/// impl TableRow for Ticket {
///     type Key = u64;
///
///     fn key(&self) -> u64 {
///         self.number
///     }
/// }
/// ```
pub trait TableRow: 'static {
    /// The key type used to identify this row.
    type Key: Clone + Eq + Hash + fmt::Debug + 'static;

    /// Return a unique key for this row.
    fn key(&self) -> Self::Key;
}

// =============================================================================
// Column
// =============================================================================

type Accessor<R> = Arc<dyn Fn(&R) -> CellValue>;
type Renderer<R> = Arc<dyn Fn(&CellValue, &R) -> String>;

/// A table column definition.
///
/// Pairs an accessor, which pulls a [`CellValue`] out of a row, with an
/// optional renderer that turns it into display text. Columns are filterable
/// by default and must opt into sorting.
pub struct Column<R> {
    id: String,
    header: String,
    accessor: Accessor<R>,
    renderer: Option<Renderer<R>>,
    sortable: bool,
    filterable: bool,
}

impl<R> Column<R> {
    /// Create a new column with the given id, header and value accessor.
    pub fn new<F>(id: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&R) -> CellValue + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Arc::new(accessor),
            renderer: None,
            sortable: false,
            filterable: true,
        }
    }

    /// Allow sorting by this column.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Include or exclude this column from global filter matching.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.filterable = filterable;
        self
    }

    /// Use a custom renderer for display text.
    pub fn render_with<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&CellValue, &R) -> String + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Get the column id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the header text.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Extract this column's value from a row.
    pub fn value(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Display text for this column's cell in a row.
    pub fn display(&self, row: &R) -> String {
        let value = self.value(row);
        match &self.renderer {
            Some(render) => render(&value, row),
            None => value.to_string(),
        }
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: Arc::clone(&self.accessor),
            renderer: self.renderer.clone(),
            sortable: self.sortable,
            filterable: self.filterable,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("filterable", &self.filterable)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Laptop {
        serial: &'static str,
        ram_gb: i64,
    }

    #[test]
    fn test_defaults() {
        let col = Column::new("serial", "Serial", |l: &Laptop| l.serial.into());
        assert_eq!(col.id(), "serial");
        assert_eq!(col.header(), "Serial");
        assert!(!col.is_sortable());
        assert!(col.is_filterable());
    }

    #[test]
    fn test_display_uses_renderer() {
        let col = Column::new("ram", "RAM", |l: &Laptop| l.ram_gb.into())
            .render_with(|value, _| format!("{value} GB"));
        let laptop = Laptop { serial: "LAP-1", ram_gb: 16 };
        assert_eq!(col.value(&laptop), CellValue::Integer(16));
        assert_eq!(col.display(&laptop), "16 GB");
    }

    #[test]
    fn test_display_defaults_to_value_text() {
        let col = Column::new("serial", "Serial", |l: &Laptop| l.serial.into());
        let laptop = Laptop { serial: "LAP-9", ram_gb: 8 };
        assert_eq!(col.display(&laptop), "LAP-9");
    }
}
