//! The set of transactions the user has checked in the table.

use super::core::TransactionId;

/// The IDs of the selected transactions, in the order they were selected.
///
/// IDs are unique. The set may hold IDs of transactions that are currently
/// hidden by the filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<TransactionId>,
}

impl SelectionSet {
    /// Create a selection from `ids`, dropping duplicates.
    pub fn from_ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TransactionId>,
    {
        let mut selection = Self::default();

        for id in ids {
            let id = id.into();
            if !selection.contains(&id) {
                selection.ids.push(id);
            }
        }

        selection
    }

    /// The selected IDs.
    pub fn ids(&self) -> &[TransactionId] {
        &self.ids
    }

    /// The number of selected IDs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Select `id` if it is not selected, otherwise deselect it.
    pub fn toggle(&mut self, id: &str) {
        if !self.remove(id) {
            self.ids.push(id.to_owned());
        }
    }

    /// Deselect `id`. Returns whether it was selected.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|selected| selected == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Select exactly `visible_ids`, or deselect everything if all of them are
    /// already selected.
    ///
    /// "All selected" compares counts, so hidden selected IDs can make a
    /// partial selection look complete.
    pub fn toggle_all(&mut self, visible_ids: &[&str]) {
        if self.all_selected(visible_ids.len()) {
            self.clear();
        } else {
            *self = Self::from_ids(visible_ids.iter().copied());
        }
    }

    /// Whether the header checkbox should be checked for a table showing
    /// `visible_count` rows.
    pub fn all_selected(&self, visible_count: usize) -> bool {
        visible_count > 0 && self.ids.len() == visible_count
    }
}
