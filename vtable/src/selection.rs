use crate::{KeySet, RowKey};

/// Checkbox selection with complement semantics.
///
/// While `select_all` is set, only the rows the user unticked are stored (`deselected`); otherwise
/// only the ticked rows are (`selected`). One of the two sets is always empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionState {
    select_all: bool,
    selected: KeySet,
    deselected: KeySet,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    pub fn selected(&self) -> &KeySet {
        &self.selected
    }

    pub fn deselected(&self) -> &KeySet {
        &self.deselected
    }

    pub fn is_selected(&self, key: &RowKey) -> bool {
        if self.select_all {
            !self.deselected.contains(key)
        } else {
            self.selected.contains(key)
        }
    }

    /// Flips one row. Returns the row's new selection state.
    pub fn toggle(&mut self, key: &RowKey) -> bool {
        let set = if self.select_all {
            &mut self.deselected
        } else {
            &mut self.selected
        };
        if !set.remove(key) {
            set.insert(key.clone());
        }
        self.is_selected(key)
    }

    /// Selects (`true`) or unselects (`false`) every row, clearing both sets.
    pub fn select_all(&mut self, select: bool) {
        self.select_all = select;
        self.selected.clear();
        self.deselected.clear();
    }

    /// Number of selected rows among `total` rows.
    pub fn selected_count(&self, total: usize) -> usize {
        if self.select_all {
            total.saturating_sub(self.deselected.len())
        } else {
            self.selected.len()
        }
    }

    pub fn clear(&mut self) {
        self.select_all(false);
    }
}

/// The single row targeted by click, double-click or right-click.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveRow(Option<RowKey>);

impl ActiveRow {
    pub fn get(&self) -> Option<&RowKey> {
        self.0.as_ref()
    }

    pub fn is(&self, key: &RowKey) -> bool {
        self.0.as_ref() == Some(key)
    }

    /// Makes `key` active. Returns `false` if it already was.
    pub fn set(&mut self, key: RowKey) -> bool {
        if self.is(&key) {
            return false;
        }
        self.0 = Some(key);
        true
    }

    pub fn clear(&mut self) -> Option<RowKey> {
        self.0.take()
    }
}
