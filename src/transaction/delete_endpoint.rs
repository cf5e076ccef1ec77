//! Defines the endpoints for deleting the selected transactions of an account,
//! or a single transaction.
//!
//! Both endpoints respond with the updated transactions table and an
//! out-of-band alert, or with an error alert on failure.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, Query};
use axum_htmx::HxPushUrl;
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::AccountId,
    alert::Alert,
    endpoints::{self, format_endpoint},
};

use super::{
    account_page::load_account_records,
    bulk_delete::{Confirm, DeleteCoordinator, Notification},
    core::TransactionId,
    store::SqliteTransactionStore,
    table::TransactionTable,
    table_query::{TableQuery, table_url},
    view::transaction_table_view,
};

/// The state needed to delete transactions.
#[derive(Debug, Clone)]
pub struct DeleteTransactionsState {
    /// The database connection for reloading the table after a delete.
    db_connection: Arc<Mutex<Connection>>,
    /// Runs the deletes, one at a time.
    delete_coordinator: Arc<DeleteCoordinator<SqliteTransactionStore>>,
}

impl FromRef<AppState> for DeleteTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            delete_coordinator: state.delete_coordinator.clone(),
        }
    }
}

/// The answer to the confirmation prompt, given by the browser before the
/// request was sent.
struct FormConfirmation(bool);

#[async_trait::async_trait]
impl Confirm for FormConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        if !self.0 {
            tracing::debug!("delete not confirmed: {message}");
        }

        self.0
    }
}

/// A route handler for deleting the selected transactions of an account.
///
/// The form holds the table state, including the repeated `selected` IDs, and
/// `confirmed=true` once the user has agreed to the delete.
pub async fn bulk_delete_endpoint(
    State(state): State<DeleteTransactionsState>,
    Path(account_id): Path<AccountId>,
    Form(form): Form<TableQuery>,
) -> Response {
    let confirmation = FormConfirmation(form.confirmed == Some(true));
    let mut table = match load_table(&state, &account_id, form) {
        Ok(table) => table,
        Err(error) => return error.into_alert_response(),
    };
    let mut notifications = Vec::new();

    match table
        .delete_selected(&state.delete_coordinator, &confirmation, &mut notifications)
        .await
    {
        Ok(outcome) => {
            tracing::info!("bulk delete for account {account_id}: {outcome:?}");
            render_table(&state, &account_id, table, notifications)
        }
        Err(error) => {
            tracing::error!("could not delete transactions for account {account_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler for deleting a single transaction without confirmation.
///
/// The query string holds the table state so the updated table can be rendered.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionsState>,
    Path((account_id, transaction_id)): Path<(AccountId, TransactionId)>,
    Query(query): Query<TableQuery>,
) -> Response {
    let mut table = match load_table(&state, &account_id, query) {
        Ok(table) => table,
        Err(error) => return error.into_alert_response(),
    };
    let mut notifications = Vec::new();

    match table
        .delete_one(&transaction_id, &state.delete_coordinator, &mut notifications)
        .await
    {
        Ok(_) => render_table(&state, &account_id, table, notifications),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Build the table the user is looking at. Actions in `query` are ignored.
fn load_table(
    state: &DeleteTransactionsState,
    account_id: &str,
    query: TableQuery,
) -> Result<TransactionTable, Error> {
    let (_, records) = load_account_records(&state.db_connection, account_id)?;
    let (table, _) = query.without_action().into_table(records);

    Ok(table)
}

/// Reload the transactions into `table` and render it with `notifications`
/// as out-of-band alerts.
fn render_table(
    state: &DeleteTransactionsState,
    account_id: &str,
    mut table: TransactionTable,
    notifications: Vec<Notification>,
) -> Response {
    match load_account_records(&state.db_connection, account_id) {
        Ok((_, records)) => table.set_records(records),
        Err(error) => return error.into_alert_response(),
    }

    let page_url = table_url(
        &format_endpoint(endpoints::ACCOUNT_VIEW, &[account_id]),
        &table,
    );

    (
        HxPushUrl(page_url),
        html! {
            (transaction_table_view(&table, account_id))

            @for notification in notifications {
                (Alert::from(notification).into_oob_html())
            }
        },
    )
        .into_response()
}
