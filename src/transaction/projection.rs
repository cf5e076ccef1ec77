//! Turns the transactions of an account into the rows shown in the table.

use super::{core::TransactionRecord, filter::FilterState, sort::SortState};

/// Get the transactions that pass `filters`, ordered by `sort`.
///
/// Transactions that compare equal keep their relative order from `records`.
pub fn project<'a>(
    records: &'a [TransactionRecord],
    filters: &FilterState,
    sort: SortState,
) -> Vec<&'a TransactionRecord> {
    project_indices(records, filters, sort)
        .into_iter()
        .map(|index| &records[index])
        .collect()
}

/// Like [project], but returns the indices of the visible transactions in `records`.
pub(crate) fn project_indices(
    records: &[TransactionRecord],
    filters: &FilterState,
    sort: SortState,
) -> Vec<usize> {
    let keep = filters.predicate();

    let mut visible: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| keep(record))
        .map(|(index, _)| index)
        .collect();

    // `sort_by` is stable.
    visible.sort_by(|&a, &b| sort.compare(&records[a], &records[b]));

    visible
}
