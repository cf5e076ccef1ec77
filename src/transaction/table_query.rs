//! Encodes the state of the transactions table in the URL so that every
//! request can rebuild the table, apply the requested change and render it.

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{IntoDeserializer, value::StrDeserializer},
};

use super::{
    core::{TransactionId, TransactionKind, TransactionRecord},
    filter::{FilterState, RecurringFilter},
    selection::SelectionSet,
    sort::{SortDirection, SortField, SortState},
    table::TransactionTable,
};

/// The query parameters of the account page.
///
/// The first group of fields is the table state. The second group holds at
/// most one action to apply to that state, e.g. `toggle=<transaction id>`.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    search: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    kind: Option<TransactionKind>,
    #[serde(default, deserialize_with = "empty_as_none")]
    recurring: Option<RecurringFilter>,
    #[serde(default, deserialize_with = "empty_as_none")]
    sort: Option<SortField>,
    #[serde(default, deserialize_with = "empty_as_none")]
    direction: Option<SortDirection>,
    #[serde(default)]
    selected: Vec<TransactionId>,

    toggle: Option<TransactionId>,
    toggle_all: Option<bool>,
    #[serde(default, deserialize_with = "empty_as_none")]
    sort_by: Option<SortField>,
    clear: Option<bool>,

    /// Set by the bulk delete button once the user has confirmed the delete.
    pub(crate) confirmed: Option<bool>,
}

/// Treat a missing or empty value, e.g. the "All Types" option, as no value.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => {
            let value: StrDeserializer<D::Error> = value.into_deserializer();
            T::deserialize(value).map(Some)
        }
    }
}

/// A change to the table requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TableAction {
    Toggle(TransactionId),
    ToggleAll,
    SortBy(SortField),
    ClearFilters,
}

impl TableAction {
    fn apply(self, table: &mut TransactionTable) {
        match self {
            TableAction::Toggle(id) => table.toggle(&id),
            TableAction::ToggleAll => table.toggle_all(),
            TableAction::SortBy(field) => table.sort_by(field),
            TableAction::ClearFilters => table.clear_all(),
        }
    }
}

impl TableQuery {
    fn take_action(&mut self) -> Option<TableAction> {
        if self.clear.take() == Some(true) {
            Some(TableAction::ClearFilters)
        } else if let Some(field) = self.sort_by.take() {
            Some(TableAction::SortBy(field))
        } else if self.toggle_all.take() == Some(true) {
            Some(TableAction::ToggleAll)
        } else {
            self.toggle.take().map(TableAction::Toggle)
        }
    }

    /// Drop the requested action, keeping only the table state.
    pub(crate) fn without_action(mut self) -> Self {
        self.take_action();
        self
    }

    /// Build the table for `records` and apply the requested action, if any.
    ///
    /// Returns the table and whether an action was applied.
    pub fn into_table(mut self, records: Vec<TransactionRecord>) -> (TransactionTable, bool) {
        let action = self.take_action();

        let filters = FilterState {
            search: self.search,
            kind: self.kind,
            recurring: self.recurring,
        };
        let sort = SortState {
            field: self.sort.unwrap_or_default(),
            direction: self.direction.unwrap_or_default(),
        };
        let selection = SelectionSet::from_ids(self.selected);
        let mut table = TransactionTable::with_state(records, filters, sort, selection);

        let applied = action.is_some();
        if let Some(action) = action {
            tracing::debug!("applying table action {action:?}");
            action.apply(&mut table);
        }

        (table, applied)
    }
}

/// The table state as it appears in the query string.
#[derive(Debug, Serialize)]
struct TableParams<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    search: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<TransactionKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recurring: Option<RecurringFilter>,
    sort: SortField,
    direction: SortDirection,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    selected: &'a [TransactionId],
}

/// The query string that recreates the filters, sort order and selection of `table`.
pub(crate) fn table_query_string(table: &TransactionTable) -> String {
    let filters = table.filters();
    let sort = table.sort();
    let params = TableParams {
        search: &filters.search,
        kind: filters.kind,
        recurring: filters.recurring,
        sort: sort.field,
        direction: sort.direction,
        selected: table.selection().ids(),
    };

    serde_html_form::to_string(&params)
        .inspect_err(|error| tracing::error!("could not encode table state {params:?}: {error}"))
        .unwrap_or_default()
}

/// The URL of `route` showing `table` as it is now.
pub(crate) fn table_url(route: &str, table: &TransactionTable) -> String {
    let query = table_query_string(table);

    if query.is_empty() {
        route.to_owned()
    } else {
        format!("{route}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::transaction::{
        SortDirection, SortField, SortState, TransactionKind, TransactionRecord, TransactionTable,
    };

    use super::{TableQuery, table_url};

    fn parse(query: &str) -> TableQuery {
        serde_html_form::from_str(query).unwrap()
    }

    fn records() -> Vec<TransactionRecord> {
        ["1", "2", "3"]
            .into_iter()
            .map(|id| {
                TransactionRecord::build(
                    id,
                    "checking",
                    TransactionKind::Expense,
                    dec!(1),
                    datetime!(2024-01-01 0:00 UTC),
                )
                .description(&format!("Transaction {id}"))
                .finish()
            })
            .collect()
    }

    #[test]
    fn empty_query_gives_default_table() {
        let (table, applied) = parse("").into_table(records());

        assert!(!applied);
        assert_eq!(table, TransactionTable::new(records()));
    }

    #[test]
    fn empty_select_values_mean_no_filter() {
        let (table, _) = parse("search=&kind=&recurring=").into_table(records());

        assert!(!table.has_active_filters());
    }

    #[test]
    fn empty_sort_values_use_default_sort() {
        let (table, applied) = parse("sort=&direction=&sort_by=").into_table(records());

        assert!(!applied);
        assert_eq!(table.sort(), SortState::default());
    }

    #[test]
    fn invalid_kind_is_rejected() {
        let got = serde_html_form::from_str::<TableQuery>("kind=REFUND");

        assert!(got.is_err());
    }

    #[test]
    fn parses_state_and_repeated_selection() {
        let query =
            parse("search=Transaction&kind=EXPENSE&recurring=non-recurring&sort=amount&direction=asc&selected=1&selected=3");

        let (table, applied) = query.into_table(records());

        assert!(!applied);
        assert_eq!(table.filters().search, "Transaction");
        assert_eq!(table.filters().kind, Some(TransactionKind::Expense));
        assert_eq!(table.sort().field, SortField::Amount);
        assert_eq!(table.sort().direction, SortDirection::Ascending);
        assert_eq!(table.selection().ids(), ["1", "3"]);
    }

    #[test]
    fn toggle_action_updates_selection() {
        let (table, applied) = parse("selected=1&toggle=2").into_table(records());

        assert!(applied);
        assert_eq!(table.selection().ids(), ["1", "2"]);
    }

    #[test]
    fn sort_by_action_toggles_sort() {
        let (table, _) = parse("sort=amount&direction=asc&sort_by=amount").into_table(records());

        assert_eq!(table.sort().direction, SortDirection::Descending);
    }

    #[test]
    fn toggle_all_action_selects_visible_rows() {
        let (table, _) = parse("search=2&toggle_all=true").into_table(records());

        assert_eq!(table.selection().ids(), ["2"]);
    }

    #[test]
    fn clear_action_removes_filters() {
        let (table, applied) = parse("search=2&kind=INCOME&clear=true").into_table(records());

        assert!(applied);
        assert!(!table.has_active_filters());
        assert_eq!(table.visible().len(), 3);
    }

    #[test]
    fn clear_action_empties_selection() {
        let (table, _) =
            parse("kind=EXPENSE&selected=1&selected=3&clear=true").into_table(records());

        assert!(table.selection().is_empty());
        assert_eq!(
            table_url("/accounts/checking", &table),
            "/accounts/checking?sort=date&direction=desc"
        );
    }

    #[test]
    fn without_action_keeps_state_and_drops_action() {
        let query = parse("search=Transaction&selected=1&toggle=2&clear=true").without_action();

        let (table, applied) = query.into_table(records());

        assert!(!applied);
        assert_eq!(table.filters().search, "Transaction");
        assert_eq!(table.selection().ids(), ["1"]);
    }

    #[test]
    fn url_round_trips_table_state() {
        let (table, _) =
            parse("search=a+b&kind=INCOME&sort=category&direction=asc&selected=1&selected=2")
                .into_table(records());

        let url = table_url("/accounts/checking", &table);

        assert_eq!(
            url,
            "/accounts/checking?search=a+b&kind=INCOME&sort=category&direction=asc&selected=1&selected=2"
        );
        let query = url.split_once('?').unwrap().1;
        let (round_tripped, _) = parse(query).into_table(records());
        assert_eq!(round_tripped, table);
    }

    #[test]
    fn url_for_default_table_only_has_sort() {
        let table = TransactionTable::new(records());

        let url = table_url("/accounts/checking", &table);

        assert_eq!(url, "/accounts/checking?sort=date&direction=desc");
    }
}
