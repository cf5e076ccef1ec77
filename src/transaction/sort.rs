//! The sort order of the transactions table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::core::TransactionRecord;

/// The column the transactions table is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Sort by when the transaction happened.
    #[default]
    Date,
    /// Sort by the stored amount, sign included.
    Amount,
    /// Sort by category name.
    Category,
}

impl SortField {
    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::Category => "category",
        }
    }
}

/// Whether to sort smallest or largest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The active sort column and direction. Defaults to the most recent transactions first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    /// The column to sort by.
    pub field: SortField,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortState {
    /// The sort state after the user picks `field`.
    ///
    /// Picking the active field flips the direction, picking another field
    /// switches to it in ascending order.
    pub fn toggled(self, field: SortField) -> Self {
        if self.field == field {
            SortState {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            SortState {
                field,
                direction: SortDirection::Ascending,
            }
        }
    }

    /// Compare two transactions by the active field in the active direction.
    pub fn compare(&self, a: &TransactionRecord, b: &TransactionRecord) -> Ordering {
        let ordering = match self.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.cmp(&b.amount),
            SortField::Category => locale_compare(&a.category, &b.category),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Compare strings the way people expect them to be listed: case does not
/// decide the order unless the strings are otherwise equal, in which case
/// lowercase comes first.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);

    folded_a.cmp(folded_b).then_with(|| b.cmp(a))
}
