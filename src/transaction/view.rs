//! HTML rendering for the account page and its transactions table.

use maud::{Markup, html};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    account::Account,
    category::category_color,
    endpoints::{self, edit_transaction_url, format_endpoint},
    html::{
        BADGE_STYLE, BUTTON_DANGER_STYLE, BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, loading_spinner,
    },
};

use super::{
    core::{TransactionKind, TransactionRecord},
    filter::RecurringFilter,
    sort::{SortDirection, SortField},
    table::{TransactionTable, delete_confirmation_message},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The number of columns in the transactions table.
const TABLE_COLUMNS: usize = 7;

/// The ID of the element that is replaced when the table changes.
const TABLE_ID: &str = "transaction-table";
const TABLE_TARGET: &str = "#transaction-table";
const TABLE_FORM_TARGET: &str = "#transaction-table-form";

const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");

const DATE_ATTRIBUTE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

/// Render the full account page.
pub(crate) fn account_page_view(account: &Account, table: &TransactionTable) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl"
            {
                header class="flex justify-between flex-wrap items-end gap-2"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (account.name) }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Balance: " (format_currency(account.balance))
                        }
                    }

                    a href=(endpoints::ACCOUNTS_VIEW) class=(LINK_STYLE) { "All Accounts" }
                }

                (transaction_table_view(table, &account.id))
            }
        }
    };

    base(&account.name, &content)
}

/// Render the filters, bulk actions and rows of `table`.
///
/// This is the fragment that HTMX requests swap in place of the current table.
pub(crate) fn transaction_table_view(table: &TransactionTable, account_id: &str) -> Markup {
    let page_url = format_endpoint(endpoints::ACCOUNT_VIEW, &[account_id]);
    let bulk_delete_url = format_endpoint(endpoints::BULK_DELETE_TRANSACTIONS, &[account_id]);
    let filters = table.filters();
    let sort = table.sort();
    let selection = table.selection();
    let toggle_all_vals = serde_json::json!({ "toggle_all": true }).to_string();
    let clear_vals = serde_json::json!({ "clear": true }).to_string();
    let confirmed_vals = serde_json::json!({ "confirmed": true }).to_string();

    html! {
        div id=(TABLE_ID) class="w-full space-y-4"
        {
            form
                id="transaction-table-form"
                hx-get=(page_url)
                hx-trigger="input changed delay:300ms from:#search, change from:#kind-filter, change from:#recurring-filter"
                hx-target=(TABLE_TARGET)
                hx-swap="outerHTML"
                class="flex flex-wrap items-center gap-2"
            {
                div class="flex-1 min-w-48"
                {
                    label for="search" class="sr-only" { "Search" }
                    input
                        id="search"
                        type="search"
                        name="search"
                        value=(filters.search)
                        placeholder="Search descriptions..."
                        autocomplete="off"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                label for="kind-filter" class="sr-only" { "Type" }
                select id="kind-filter" name="kind" class=(FORM_TEXT_INPUT_STYLE) style="width: auto"
                {
                    option value="" selected[filters.kind.is_none()] { "All Types" }

                    @for kind in [TransactionKind::Income, TransactionKind::Expense] {
                        option value=(kind.as_str()) selected[filters.kind == Some(kind)]
                        {
                            (kind.label())
                        }
                    }
                }

                label for="recurring-filter" class="sr-only" { "Recurring" }
                select
                    id="recurring-filter"
                    name="recurring"
                    class=(FORM_TEXT_INPUT_STYLE)
                    style="width: auto"
                {
                    option value="" selected[filters.recurring.is_none()] { "All Transactions" }

                    @for recurring in [RecurringFilter::Recurring, RecurringFilter::NonRecurring] {
                        option
                            value=(recurring.as_query_value())
                            selected[filters.recurring == Some(recurring)]
                        {
                            (recurring.label())
                        }
                    }
                }

                input type="hidden" name="sort" value=(sort.field.as_query_value());
                input type="hidden" name="direction" value=(sort.direction.as_query_value());

                @for id in selection.ids() {
                    input type="hidden" name="selected" value=(id);
                }

                @if table.has_active_filters() {
                    button
                        type="button"
                        hx-get=(page_url)
                        hx-include=(TABLE_FORM_TARGET)
                        hx-vals=(clear_vals)
                        hx-target=(TABLE_TARGET)
                        hx-swap="outerHTML"
                        class=(BUTTON_SECONDARY_STYLE)
                    {
                        "Clear Filters"
                    }
                }

                @if !selection.is_empty() {
                    button
                        id="bulk-delete-button"
                        type="button"
                        hx-post=(bulk_delete_url)
                        hx-include=(TABLE_FORM_TARGET)
                        hx-vals=(confirmed_vals)
                        hx-confirm=(delete_confirmation_message(selection.len()))
                        hx-target=(TABLE_TARGET)
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        hx-indicator="#delete-indicator"
                        hx-disabled-elt="this"
                        class={ "inline-flex items-center " (BUTTON_DANGER_STYLE) }
                    {
                        span id="delete-indicator" class="htmx-indicator" { (loading_spinner()) }
                        "Delete Selected (" (selection.len()) ")"
                    }
                }
            }

            div class="overflow-x-auto rounded"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class="px-4 py-3"
                            {
                                input
                                    type="checkbox"
                                    aria-label="Select all transactions"
                                    checked[table.all_selected()]
                                    hx-get=(page_url)
                                    hx-include=(TABLE_FORM_TARGET)
                                    hx-vals=(toggle_all_vals)
                                    hx-target=(TABLE_TARGET)
                                    hx-swap="outerHTML";
                            }
                            (sortable_header("Date", SortField::Date, table, &page_url))
                            th scope="col" class="px-6 py-3" { "Description" }
                            (sortable_header("Category", SortField::Category, table, &page_url))
                            (sortable_header("Amount", SortField::Amount, table, &page_url))
                            th scope="col" class="px-6 py-3" { "Recurring" }
                            th scope="col" class="px-6 py-3" { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for transaction in table.visible() {
                            (transaction_row_view(
                                transaction,
                                table.is_selected(&transaction.id),
                                &page_url,
                                account_id,
                            ))
                        }

                        @if table.visible().len() == 0 {
                            tr
                            {
                                td
                                    colspan=(TABLE_COLUMNS)
                                    data-empty-state="true"
                                    class="px-6 py-4 text-center"
                                {
                                    "No Transactions Found"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn sortable_header(
    label: &str,
    field: SortField,
    table: &TransactionTable,
    page_url: &str,
) -> Markup {
    let sort = table.sort();
    let is_active = sort.field == field;
    let (arrow, aria_sort) = match (is_active, sort.direction) {
        (false, _) => ("", "none"),
        (true, SortDirection::Ascending) => (" ↑", "ascending"),
        (true, SortDirection::Descending) => (" ↓", "descending"),
    };
    let sort_vals = serde_json::json!({ "sort_by": field }).to_string();

    html! {
        th scope="col" class="px-6 py-3" aria-sort=(aria_sort)
        {
            button
                type="button"
                hx-get=(page_url)
                hx-include=(TABLE_FORM_TARGET)
                hx-vals=(sort_vals)
                hx-target=(TABLE_TARGET)
                hx-swap="outerHTML"
                class="uppercase font-semibold hover:text-blue-600 dark:hover:text-blue-400"
            {
                (label) (arrow)
            }
        }
    }
}

fn transaction_row_view(
    transaction: &TransactionRecord,
    is_selected: bool,
    page_url: &str,
    account_id: &str,
) -> Markup {
    let toggle_vals = serde_json::json!({ "toggle": transaction.id }).to_string();
    let delete_url = format_endpoint(
        endpoints::DELETE_TRANSACTION,
        &[account_id, &transaction.id],
    );
    let (description, tooltip) = format_row_description(transaction.description.as_deref());

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class="px-4 py-4"
            {
                input
                    type="checkbox"
                    aria-label="Select transaction"
                    checked[is_selected]
                    hx-get=(page_url)
                    hx-include=(TABLE_FORM_TARGET)
                    hx-vals=(toggle_vals)
                    hx-target=(TABLE_TARGET)
                    hx-swap="outerHTML";
            }

            td class={ "whitespace-nowrap " (TABLE_CELL_STYLE) }
            {
                time datetime=(date_attribute(transaction.date)) { (display_date(transaction.date)) }
            }

            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }

            td class=(TABLE_CELL_STYLE)
            {
                span
                    class=(BADGE_STYLE)
                    style={ "border-color: " (category_color(&transaction.category)) ";" }
                    data-category=(transaction.category)
                {
                    (transaction.category)
                }
            }

            td class={ "whitespace-nowrap font-medium " (amount_class(transaction.kind)) " " (TABLE_CELL_STYLE) }
            {
                (format_amount(transaction))
            }

            td class=(TABLE_CELL_STYLE) { (recurring_badge(transaction)) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_transaction_url(&transaction.id)) class=(LINK_STYLE) { "Edit" }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-include=(TABLE_FORM_TARGET)
                        hx-target=(TABLE_TARGET)
                        hx-swap="outerHTML"
                        hx-target-error="#alert-container"
                        hx-disabled-elt="this"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn recurring_badge(transaction: &TransactionRecord) -> Markup {
    if !transaction.is_recurring {
        return html! { span class=(BADGE_STYLE) { "One-time" } };
    }

    let label = transaction
        .recurring_interval
        .map_or("Recurring", |interval| interval.label());
    let next_date = transaction
        .next_recurring_date
        .map(|date| format!("Next date: {}", display_date(date)));

    html! {
        span
            class={ (BADGE_STYLE) " bg-purple-50 dark:bg-purple-900" }
            title=[next_date]
        {
            (label)
        }
    }
}

fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "text-red-700 dark:text-red-300",
        TransactionKind::Income => "text-green-700 dark:text-green-300",
    }
}

/// Expenses are shown with a minus sign and income with a plus sign.
fn format_amount(transaction: &TransactionRecord) -> String {
    let sign = match transaction.kind {
        TransactionKind::Expense => "-",
        TransactionKind::Income => "+",
    };

    format!("{sign}{}", format_currency(transaction.amount.abs()))
}

fn display_date(date: OffsetDateTime) -> String {
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.date().to_string())
}

fn date_attribute(date: OffsetDateTime) -> String {
    date.format(DATE_ATTRIBUTE_FORMAT)
        .unwrap_or_else(|_| date.date().to_string())
}

/// Truncate long descriptions, returning the full text as a tooltip if truncated.
fn format_row_description(description: Option<&str>) -> (String, Option<&str>) {
    let Some(description) = description else {
        return ("-".to_owned(), None);
    };

    if description.graphemes(true).count() <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();

        (truncated + "...", Some(description))
    }
}
