//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The [TransactionRecord] model and [TransactionBuilder] for creating transactions
//! - Database functions for storing, querying and deleting transactions
//! - The [TransactionTable]: filtering, sorting, row selection and bulk deletion
//! - The account page and delete endpoints that serve the table over HTMX

mod account_page;
mod bulk_delete;
mod core;
mod delete_endpoint;
mod filter;
mod projection;
mod selection;
mod sort;
mod store;
mod table;
mod table_query;
mod view;

pub use account_page::get_account_page;
pub use bulk_delete::{
    Confirm, DeleteCoordinator, DeleteOutcome, DeleteTransactions, Notification,
    NotificationLevel, Notify,
};
pub use core::{
    RecurringInterval, TransactionBuilder, TransactionId, TransactionKind, TransactionRecord,
    create_transaction, create_transaction_table,
};
pub use delete_endpoint::{bulk_delete_endpoint, delete_transaction_endpoint};
pub use filter::{FilterState, RecurringFilter};
pub use projection::project;
pub use selection::SelectionSet;
pub use sort::{SortDirection, SortField, SortState};
pub use store::SqliteTransactionStore;
pub use table::{Navigate, TransactionTable};

#[cfg(test)]
pub(crate) use core::get_transaction;
#[cfg(test)]
pub(crate) use table_query::TableQuery;
