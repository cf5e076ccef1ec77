//! The filters that decide which transactions are shown in the transactions table.

use serde::{Deserialize, Serialize};

use super::core::{TransactionKind, TransactionRecord};

/// Show only recurring, or only one-time, transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurringFilter {
    /// Keep transactions that repeat.
    Recurring,
    /// Keep transactions that happen once.
    NonRecurring,
}

impl RecurringFilter {
    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            RecurringFilter::Recurring => "recurring",
            RecurringFilter::NonRecurring => "non-recurring",
        }
    }

    /// The human readable name.
    pub fn label(self) -> &'static str {
        match self {
            RecurringFilter::Recurring => "Recurring Only",
            RecurringFilter::NonRecurring => "Non-recurring Only",
        }
    }

    fn matches(self, is_recurring: bool) -> bool {
        match self {
            RecurringFilter::Recurring => is_recurring,
            RecurringFilter::NonRecurring => !is_recurring,
        }
    }
}

/// The filters applied to the transactions table.
///
/// All active filters must match for a transaction to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Keep transactions whose description contains this text, ignoring case.
    ///
    /// An empty string disables the search.
    pub search: String,
    /// Keep transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Keep recurring or one-time transactions.
    pub recurring: Option<RecurringFilter>,
}

impl FilterState {
    /// Whether any filter is set.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.kind.is_some() || self.recurring.is_some()
    }

    /// Build the predicate that keeps the transactions matching every active filter.
    ///
    /// The search text is lowercased once here rather than for every transaction.
    pub(crate) fn predicate(&self) -> impl Fn(&TransactionRecord) -> bool + '_ {
        let search = self.search.to_lowercase();

        move |transaction| {
            matches_search(transaction, &search)
                && self
                    .recurring
                    .is_none_or(|filter| filter.matches(transaction.is_recurring))
                && self.kind.is_none_or(|kind| transaction.kind == kind)
        }
    }
}

/// Transactions without a description never match a non-empty search.
fn matches_search(transaction: &TransactionRecord, lowercase_search: &str) -> bool {
    if lowercase_search.is_empty() {
        return true;
    }

    transaction
        .description
        .as_deref()
        .is_some_and(|description| description.to_lowercase().contains(lowercase_search))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::transaction::{RecurringInterval, TransactionKind, TransactionRecord};

    use super::{FilterState, RecurringFilter};

    fn record(kind: TransactionKind, description: Option<&str>, recurring: bool) -> TransactionRecord {
        let mut builder = TransactionRecord::build(
            "1",
            "checking",
            kind,
            dec!(10),
            datetime!(2024-01-01 0:00 UTC),
        );
        if let Some(description) = description {
            builder = builder.description(description);
        }
        if recurring {
            builder = builder.recurring(RecurringInterval::Weekly);
        }
        builder.finish()
    }

    #[test]
    fn default_filters_are_inactive_and_match_everything() {
        let filters = FilterState::default();
        let predicate = filters.predicate();

        assert!(!filters.is_active());
        assert!(predicate(&record(TransactionKind::Income, None, false)));
        assert!(predicate(&record(TransactionKind::Expense, Some("x"), true)));
    }

    #[test]
    fn search_ignores_case() {
        let filters = FilterState {
            search: "CoFfEe".to_owned(),
            ..Default::default()
        };

        assert!(filters.predicate()(&record(
            TransactionKind::Expense,
            Some("Morning coffee"),
            false
        )));
    }

    #[test]
    fn search_excludes_missing_descriptions() {
        let filters = FilterState {
            search: "a".to_owned(),
            ..Default::default()
        };

        assert!(!filters.predicate()(&record(TransactionKind::Expense, None, false)));
    }

    #[test]
    fn recurring_filters() {
        let recurring = record(TransactionKind::Expense, None, true);
        let one_time = record(TransactionKind::Expense, None, false);
        let recurring_only = FilterState {
            recurring: Some(RecurringFilter::Recurring),
            ..Default::default()
        };
        let non_recurring_only = FilterState {
            recurring: Some(RecurringFilter::NonRecurring),
            ..Default::default()
        };

        assert!(recurring_only.predicate()(&recurring));
        assert!(!recurring_only.predicate()(&one_time));
        assert!(!non_recurring_only.predicate()(&recurring));
        assert!(non_recurring_only.predicate()(&one_time));
    }

    #[test]
    fn filters_are_a_conjunction() {
        let filters = FilterState {
            search: "pay".to_owned(),
            kind: Some(TransactionKind::Income),
            recurring: Some(RecurringFilter::Recurring),
        };
        let predicate = filters.predicate();

        assert!(predicate(&record(TransactionKind::Income, Some("Payday"), true)));
        assert!(!predicate(&record(TransactionKind::Expense, Some("Payday"), true)));
        assert!(!predicate(&record(TransactionKind::Income, Some("Payday"), false)));
        assert!(!predicate(&record(TransactionKind::Income, Some("Bonus"), true)));
    }
}
