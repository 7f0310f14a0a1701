//! Row model: global filter and sort stages.

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::value::CellValue;

/// Sort direction for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    /// Not sorted; input order.
    #[default]
    None,
    /// Ascending order (A-Z, 0-9).
    Ascending,
    /// Descending order (Z-A, 9-0).
    Descending,
}

impl SortDirection {
    /// The next state in the none → ascending → descending → none cycle.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Ascending,
            Self::Ascending => Self::Descending,
            Self::Descending => Self::None,
        }
    }

    /// Header indicator for this direction.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// The active sort: one column and a direction other than `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Compute the filtered and sorted row order as indices into `rows`.
///
/// A row passes the filter when any filterable column's value, lower-cased,
/// contains the lower-cased query. The sort is stable: rows with equal keys
/// keep their input order in both directions.
pub(crate) fn build_row_model<R>(
    rows: &[R],
    columns: &[Column<R>],
    query: &str,
    sort: Option<&SortState>,
) -> Vec<usize> {
    let needle = query.to_lowercase();
    let mut indices: Vec<usize> = if needle.is_empty() {
        (0..rows.len()).collect()
    } else {
        rows.iter()
            .enumerate()
            .filter(|(_, row)| {
                columns
                    .iter()
                    .filter(|c| c.is_filterable())
                    .any(|c| c.value(row).search_text().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect()
    };

    let Some(sort) = sort else {
        return indices;
    };
    let Some(column) = columns.iter().find(|c| c.id() == sort.column) else {
        return indices;
    };

    // Extract each key once rather than on every comparison
    let mut keyed: Vec<_> = indices
        .drain(..)
        .map(|i| (i, column.value(&rows[i])))
        .collect();
    if is_mixed(keyed.iter().map(|(_, v)| v)) {
        for (_, value) in &mut keyed {
            *value = value.as_sort_text();
        }
    }
    match sort.direction {
        SortDirection::None => {}
        SortDirection::Ascending => keyed.sort_by(|(_, a), (_, b)| a.compare(b)),
        SortDirection::Descending => keyed.sort_by(|(_, a), (_, b)| b.compare(a)),
    }
    keyed.into_iter().map(|(i, _)| i).collect()
}

/// Whether non-empty values span more than one sort kind. Such a column
/// sorts by display text.
fn is_mixed<'a>(values: impl Iterator<Item = &'a CellValue>) -> bool {
    let mut kinds = values.filter(|v| !v.is_empty()).map(CellValue::kind_rank);
    match kinds.next() {
        Some(first) => kinds.any(|k| k != first),
        None => false,
    }
}
