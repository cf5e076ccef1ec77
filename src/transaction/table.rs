//! The state of the transactions table of an account page.

use crate::{Error, endpoints::edit_transaction_url};

use super::{
    bulk_delete::{
        Confirm, DeleteCoordinator, DeleteOutcome, DeleteTransactions, Notification, Notify,
    },
    core::{TransactionKind, TransactionRecord},
    filter::{FilterState, RecurringFilter},
    projection::project_indices,
    selection::SelectionSet,
    sort::{SortField, SortState},
};

/// The question asked before deleting `count` selected transactions.
pub(crate) fn delete_confirmation_message(count: usize) -> String {
    format!("Are you sure you want to delete {count} transactions?")
}

/// Sends the user to another page.
pub trait Navigate {
    /// Go to `path`.
    fn navigate(&mut self, path: &str);
}

/// A filtered and sorted view of an account's transactions with row
/// selection.
///
/// The visible rows are recomputed whenever the transactions, filters or
/// sort order change. Changing a filter does not change the selection, but
/// [TransactionTable::clear_all] empties it along with the filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTable {
    records: Vec<TransactionRecord>,
    filters: FilterState,
    sort: SortState,
    selection: SelectionSet,
    visible: Vec<usize>,
}

impl TransactionTable {
    /// Create a table showing `records` with no filters, the default sort
    /// order and nothing selected.
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self::with_state(
            records,
            FilterState::default(),
            SortState::default(),
            SelectionSet::default(),
        )
    }

    /// Create a table with the given filters, sort order and selection.
    pub fn with_state(
        records: Vec<TransactionRecord>,
        filters: FilterState,
        sort: SortState,
        selection: SelectionSet,
    ) -> Self {
        let mut table = Self {
            records,
            filters,
            sort,
            selection,
            visible: Vec::new(),
        };
        table.refresh_view();
        table
    }

    /// All transactions, including the hidden ones.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Replace the transactions, e.g. after they were reloaded from the database.
    pub fn set_records(&mut self, records: Vec<TransactionRecord>) {
        self.records = records;
        self.refresh_view();
    }

    /// The transactions that pass the filters, in sort order.
    pub fn visible(&self) -> impl ExactSizeIterator<Item = &TransactionRecord> {
        self.visible.iter().map(|&index| &self.records[index])
    }

    /// The active filters.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The active sort order.
    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// The selected transactions.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Set the description search text.
    pub fn set_search(&mut self, search: &str) {
        self.filters.search = search.to_owned();
        self.refresh_view();
    }

    /// Set or clear the transaction kind filter.
    pub fn set_kind_filter(&mut self, kind: Option<TransactionKind>) {
        self.filters.kind = kind;
        self.refresh_view();
    }

    /// Set or clear the recurring filter.
    pub fn set_recurring_filter(&mut self, recurring: Option<RecurringFilter>) {
        self.filters.recurring = recurring;
        self.refresh_view();
    }

    /// Whether any filter is set.
    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    /// Remove all filters and deselect everything. The sort order is kept.
    pub fn clear_all(&mut self) {
        self.filters = FilterState::default();
        self.selection.clear();
        self.refresh_view();
    }

    /// Sort by `field`, flipping the direction if the table is already sorted by it.
    pub fn sort_by(&mut self, field: SortField) {
        self.sort = self.sort.toggled(field);
        self.refresh_view();
    }

    /// Select or deselect the transaction `id`.
    pub fn toggle(&mut self, id: &str) {
        self.selection.toggle(id);
    }

    /// Select all visible transactions, or deselect everything if they are
    /// all selected already.
    pub fn toggle_all(&mut self) {
        let visible_ids: Vec<&str> = self
            .visible
            .iter()
            .map(|&index| self.records[index].id.as_str())
            .collect();
        self.selection.toggle_all(&visible_ids);
    }

    /// Whether the header checkbox is checked.
    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(self.visible.len())
    }

    /// Whether the transaction `id` is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    /// Open the edit page for the transaction `id`.
    pub fn edit(&self, id: &str, navigator: &mut impl Navigate) {
        navigator.navigate(&edit_transaction_url(id));
    }

    /// Ask the user to confirm, then delete the selected transactions.
    ///
    /// The account is taken from the first transaction in the table. On
    /// success the selection is cleared and the user is notified. The
    /// transactions are not reloaded, use [TransactionTable::set_records] for that.
    ///
    /// # Errors
    /// Returns [Error::MissingAccountId] if the table has no transactions,
    /// or the error from `coordinator`, in which case the selection is kept.
    pub async fn delete_selected<D, C, N>(
        &mut self,
        coordinator: &DeleteCoordinator<D>,
        confirmation: &C,
        notifier: &mut N,
    ) -> Result<DeleteOutcome, Error>
    where
        D: DeleteTransactions,
        C: Confirm,
        N: Notify + Send,
    {
        if self.selection.is_empty() {
            return Ok(DeleteOutcome::NothingSelected);
        }

        let account_id = self
            .records
            .first()
            .map(|record| record.account_id.clone())
            .ok_or(Error::MissingAccountId)?;

        let message = delete_confirmation_message(self.selection.len());
        if !confirmation.confirm(&message).await {
            return Ok(DeleteOutcome::Cancelled);
        }

        let deleted = coordinator
            .delete(self.selection.ids(), Some(&account_id))
            .await?;

        self.selection.clear();
        notifier.notify(Notification::success("Transactions deleted successfully"));

        Ok(DeleteOutcome::Deleted(deleted))
    }

    /// Delete the transaction `id` without asking for confirmation.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if nothing was deleted, or
    /// the error from `coordinator`.
    pub async fn delete_one<D, N>(
        &mut self,
        id: &str,
        coordinator: &DeleteCoordinator<D>,
        notifier: &mut N,
    ) -> Result<DeleteOutcome, Error>
    where
        D: DeleteTransactions,
        N: Notify + Send,
    {
        let deleted = coordinator.delete(&[id.to_owned()], None).await?;

        if deleted == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        self.selection.remove(id);
        notifier.notify(Notification::success("Transaction deleted successfully"));

        Ok(DeleteOutcome::Deleted(deleted))
    }

    fn refresh_view(&mut self) {
        self.visible = project_indices(&self.records, &self.filters, self.sort);
    }
}
