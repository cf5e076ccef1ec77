//! Application router configuration.

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, Error,
    account::{get_accounts_page, get_default_account},
    endpoints::{self, format_endpoint},
    error_page::{get_404_not_found, get_internal_server_error_page},
    transaction::{bulk_delete_endpoint, delete_transaction_endpoint, get_account_page},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::ACCOUNTS_VIEW, get(get_accounts_page))
        .route(endpoints::ACCOUNT_VIEW, get(get_account_page))
        .route(
            endpoints::BULK_DELETE_TRANSACTIONS,
            post(bulk_delete_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the default account, or to the accounts
/// page if there are no accounts.
async fn get_index_page(State(state): State<AppState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let redirect_url = match get_default_account(&connection)? {
        Some(account) => format_endpoint(endpoints::ACCOUNT_VIEW, &[&account.id]),
        None => endpoints::ACCOUNTS_VIEW.to_owned(),
    };

    Ok(Redirect::to(&redirect_url).into_response())
}

#[cfg(test)]
mod root_route_tests {
    use axum::{extract::State, http::StatusCode};
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        AppState,
        account::{Account, create_account},
        endpoints,
        routing::get_index_page,
    };

    #[tokio::test]
    async fn root_redirects_to_accounts_without_accounts() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();

        let response = get_index_page(State(state)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::ACCOUNTS_VIEW);
    }

    #[tokio::test]
    async fn root_redirects_to_default_account() {
        let state = AppState::new(Connection::open_in_memory().unwrap()).unwrap();
        {
            let connection = state.db_connection.lock().unwrap();
            for (id, is_default) in [("savings", false), ("checking", true)] {
                create_account(
                    &Account {
                        id: id.to_owned(),
                        name: id.to_owned(),
                        balance: dec!(0),
                        is_default,
                    },
                    &connection,
                )
                .unwrap();
            }
        }

        let response = get_index_page(State(state)).await.unwrap();

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, "/accounts/checking");
    }
}
