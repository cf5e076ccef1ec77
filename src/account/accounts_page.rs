//! Displays accounts and their balances.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::core::map_row_to_account,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
};

use super::Account;

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn accounts_view(accounts: &[Account]) -> Markup {
    let table_row = |account: &Account| {
        let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, &[&account.id]);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(account_url) class=(LINK_STYLE) { (account.name) }

                    @if account.is_default {
                        " (default)"
                    }
                }

                td class="px-6 py-4 text-right"
                {
                    (format_currency(account.balance))
                }
            }
        )
    };

    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-3xl"
            {
                h1 class="text-xl font-bold" { "Accounts" }

                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class="px-6 py-3 text-right" { "Balance" }
                        }
                    }

                    tbody
                    {
                        @for account in accounts {
                            (table_row(account))
                        }

                        @if accounts.is_empty() {
                            tr
                            {
                                td colspan="2" class="px-6 py-4 text-center"
                                {
                                    "No accounts found."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Accounts", &content)
}

/// Renders the accounts page showing all accounts.
pub async fn get_accounts_page(State(state): State<AccountsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?;

    Ok(accounts_view(&accounts).into_response())
}

fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, balance, is_default FROM account ORDER BY name ASC;")?
        .query_map([], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use scraper::Selector;

    use crate::{
        account::{Account, create_account},
        db::initialize,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{AccountsPageState, get_accounts_page, get_all_accounts};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_accounts_ordered_by_name() {
        let conn = get_test_connection();
        for (id, name) in [("2", "Savings"), ("1", "Checking")] {
            create_account(
                &Account {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    balance: dec!(1.0),
                    is_default: false,
                },
                &conn,
            )
            .unwrap();
        }

        let got = get_all_accounts(&conn).unwrap();

        let names = got.iter().map(|account| account.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Checking", "Savings"]);
    }

    #[tokio::test]
    async fn page_links_to_each_account() {
        let conn = get_test_connection();
        create_account(
            &Account {
                id: "checking".to_owned(),
                name: "Checking".to_owned(),
                balance: dec!(1234.5),
                is_default: true,
            },
            &conn,
        )
        .unwrap();
        let state = AccountsPageState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_accounts_page(State(state)).await.unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let link_selector = Selector::parse("tbody a").unwrap();
        let links = html
            .select(&link_selector)
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(links, ["/accounts/checking"]);
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("$1,234.50"), "want formatted balance in {text:?}");
    }

    #[tokio::test]
    async fn page_shows_empty_state() {
        let state = AccountsPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = get_accounts_page(State(state)).await.unwrap();

        let html = parse_html_document(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("No accounts found."), "want empty state in {text:?}");
    }
}
