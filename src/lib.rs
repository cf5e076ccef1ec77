//! Ledger is a web app for keeping track of the transactions in your accounts.
//!
//! This library provides a REST API that directly serves HTML pages. The core
//! of the app is the account transactions table: a filtered and sorted view of
//! an account's transactions with row selection and bulk deletion, see
//! [TransactionTable].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod app_state;
mod category;
mod db;
mod endpoints;
mod error_page;
mod html;
mod logging;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{Account, AccountId, create_account};
pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    Confirm, DeleteCoordinator, DeleteOutcome, DeleteTransactions, FilterState, Navigate,
    Notification, NotificationLevel, Notify, RecurringFilter, RecurringInterval, SelectionSet,
    SortDirection, SortField, SortState, SqliteTransactionStore, TransactionBuilder,
    TransactionId, TransactionKind, TransactionRecord, TransactionTable, create_transaction,
    project,
};

use crate::{
    alert::Alert,
    error_page::{InternalServerError, NotFoundPage},
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for the ctrl+c signal: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A bulk delete was requested for a table without any transactions, so
    /// there is no account to delete the transactions from.
    #[error("cannot infer the account ID from an empty list of transactions")]
    MissingAccountId,

    /// A delete was requested while another delete is still in flight.
    #[error("another delete request is still in progress")]
    DeleteInProgress,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundPage.into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for endpoints that are called by HTMX.
    fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not find the account".to_owned(),
                    details: "Try refreshing the page to see if the account still exists."
                        .to_owned(),
                },
            ),
            Error::MissingAccountId => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not delete transactions".to_owned(),
                    details: "There are no transactions in this account to delete.".to_owned(),
                },
            ),
            Error::DeleteInProgress => (
                StatusCode::CONFLICT,
                Alert::Error {
                    message: "Could not delete transactions".to_owned(),
                    details: "Another delete is still in progress. Wait for it to finish and \
                        try again."
                        .to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                        Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
