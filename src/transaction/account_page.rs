//! Defines the route handler for the account page, which shows the account's
//! transactions table.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Query;
use axum_htmx::{HxPushUrl, HxRequest};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_account},
    endpoints::{self, format_endpoint},
};

use super::{
    core::{TransactionRecord, get_account_transactions},
    table_query::{TableQuery, table_url},
    view::{account_page_view, transaction_table_view},
};

/// The state needed for the account page.
#[derive(Debug, Clone)]
pub struct AccountPageState {
    /// The database connection for reading accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the account page, or just its transactions table for HTMX requests.
///
/// The query string holds the table state and optionally an action such as
/// `toggle=<id>` or `sort_by=amount`. Requests with an action are answered
/// with the updated table and the URL that recreates it: HTMX requests get the
/// URL pushed to the browser history, and plain requests are redirected to it.
pub async fn get_account_page(
    State(state): State<AccountPageState>,
    Path(account_id): Path<AccountId>,
    HxRequest(is_htmx): HxRequest,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let (account, records) = load_account_records(&state.db_connection, &account_id)?;
    let (table, applied_action) = query.into_table(records);
    let page_url = table_url(
        &format_endpoint(endpoints::ACCOUNT_VIEW, &[&account_id]),
        &table,
    );

    if is_htmx {
        return Ok((
            HxPushUrl(page_url),
            transaction_table_view(&table, &account_id),
        )
            .into_response());
    }

    if applied_action {
        return Ok(Redirect::to(&page_url).into_response());
    }

    Ok(account_page_view(&account, &table).into_response())
}

/// Get the account `account_id` and its transactions, most recent first.
///
/// The database lock is released before returning.
///
/// # Errors
/// Returns [Error::NotFound] if the account does not exist,
/// [Error::DatabaseLockError] if the lock is poisoned, or an SQL error.
pub(crate) fn load_account_records(
    db_connection: &Arc<Mutex<Connection>>,
    account_id: &str,
) -> Result<(Account, Vec<TransactionRecord>), Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let account = get_account(account_id, &connection)
        .inspect_err(|error| tracing::debug!("could not get account {account_id}: {error}"))?;
    let records = get_account_transactions(account_id, &connection).inspect_err(|error| {
        tracing::error!("could not get transactions for account {account_id}: {error}")
    })?;

    Ok((account, records))
}
