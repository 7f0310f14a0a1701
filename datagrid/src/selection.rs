//! Row selection state.
//!
//! Selection is tracked by row key, never by position, so it survives
//! sorting, filtering and pagination. It can be owned by the table itself
//! or by the calling application (see [`SelectionState`]).

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Selection mode for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// No selection allowed.
    #[default]
    None,
    /// Single row selection (radio-button style).
    Single,
    /// Multiple rows can be selected (checkbox style).
    Multi,
}

/// Tracks selected rows by their keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<K: Clone + Eq + Hash> {
    pub mode: SelectionMode,
    pub selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new(SelectionMode::None)
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    /// Create an empty selection in the given mode.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: HashSet::new(),
        }
    }

    /// Create a selection with some keys already selected.
    pub fn with_selected(mode: SelectionMode, keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            mode,
            selected: keys.into_iter().collect(),
        }
    }

    /// Toggle selection for a key. Returns true if selection changed.
    ///
    /// Keys that do not belong to any current row are recorded all the same.
    pub fn toggle(&mut self, key: K) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                if self.selected.contains(&key) {
                    self.selected.clear();
                } else {
                    self.selected.clear();
                    self.selected.insert(key);
                }
                true
            }
            SelectionMode::Multi => {
                if !self.selected.remove(&key) {
                    self.selected.insert(key);
                }
                true
            }
        }
    }

    /// Select every key in `keys`, or deselect them all if they are already
    /// all selected. Keys outside `keys` are left alone.
    ///
    /// Only meaningful in multi mode; returns true if selection changed.
    pub fn toggle_all(&mut self, keys: &[K]) -> bool {
        if self.mode != SelectionMode::Multi || keys.is_empty() {
            return false;
        }

        if self.covers(keys) {
            for key in keys {
                self.selected.remove(key);
            }
        } else {
            self.selected.extend(keys.iter().cloned());
        }
        true
    }

    /// Check if every key in a non-empty slice is selected.
    pub fn covers(&self, keys: &[K]) -> bool {
        !keys.is_empty() && keys.iter().all(|k| self.selected.contains(k))
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// Number of selected keys.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

// =============================================================================
// SelectionState
// =============================================================================

/// Callback receiving the next full selection in controlled mode.
pub type SelectionCallback<K> = Box<dyn FnMut(&HashSet<K>)>;

/// Who owns the selection.
///
/// In uncontrolled mode the table mutates its own [`Selection`]. In
/// controlled mode the caller owns it: the table keeps a read-only snapshot,
/// computes the next full selection from it on every intent and hands that to
/// `on_change`. The snapshot only changes when the caller syncs it back.
pub enum SelectionState<K: Clone + Eq + Hash> {
    /// Selection owned by the table.
    Uncontrolled(Selection<K>),
    /// Selection owned by the caller.
    Controlled {
        snapshot: Selection<K>,
        on_change: SelectionCallback<K>,
    },
}

impl<K: Clone + Eq + Hash> SelectionState<K> {
    /// The selection as currently known to the table.
    pub fn current(&self) -> &Selection<K> {
        match self {
            Self::Uncontrolled(selection) => selection,
            Self::Controlled { snapshot, .. } => snapshot,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::Controlled { .. })
    }

    /// Apply an intent to the selection. Returns true if it changed.
    ///
    /// Controlled selections are never written here; the computed next
    /// state goes to the caller's callback instead.
    pub fn apply<F>(&mut self, intent: F) -> bool
    where
        F: FnOnce(&mut Selection<K>) -> bool,
    {
        match self {
            Self::Uncontrolled(selection) => intent(selection),
            Self::Controlled { snapshot, on_change } => {
                let mut next = snapshot.clone();
                if !intent(&mut next) {
                    return false;
                }
                on_change(&next.selected);
                true
            }
        }
    }

    /// Replace the selected keys.
    ///
    /// This is how a controlled owner hands its updated state back.
    pub fn sync(&mut self, keys: HashSet<K>) {
        match self {
            Self::Uncontrolled(selection) => selection.selected = keys,
            Self::Controlled { snapshot, .. } => snapshot.selected = keys,
        }
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug> fmt::Debug for SelectionState<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncontrolled(selection) => {
                f.debug_tuple("Uncontrolled").field(selection).finish()
            }
            Self::Controlled { snapshot, .. } => f
                .debug_struct("Controlled")
                .field("snapshot", snapshot)
                .finish_non_exhaustive(),
        }
    }
}
