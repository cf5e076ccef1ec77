//! Defines the account model and its database queries.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, db::get_decimal};

/// The identifier of an account.
pub type AccountId = String;

/// A bank account, credit card or other place where money is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The display name of the account, e.g. "Everyday Checking".
    pub name: String,
    /// The current balance, which includes the effect of all of the account's
    /// transactions.
    pub balance: Decimal,
    /// Whether this is the account shown when the user opens the app.
    pub is_default: bool,
}

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                balance TEXT NOT NULL,
                is_default INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

/// Add `account` to the database.
///
/// # Errors
/// Returns an [Error::SqlError] if the ID is already taken or there is some other SQL error.
pub fn create_account(account: &Account, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO account (id, name, balance, is_default) VALUES (?1, ?2, ?3, ?4)",
        params![
            account.id,
            account.name,
            account.balance.to_string(),
            account.is_default
        ],
    )?;

    Ok(())
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_account(id: &str, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_row(
            "SELECT id, name, balance, is_default FROM account WHERE id = ?1",
            params![id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get the default account, or if no account is marked as the default, the
/// first account by name.
///
/// Returns `Ok(None)` if there are no accounts.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_default_account(connection: &Connection) -> Result<Option<Account>, Error> {
    connection
        .query_row(
            "SELECT id, name, balance, is_default FROM account
            ORDER BY is_default DESC, name ASC
            LIMIT 1",
            [],
            map_row_to_account,
        )
        .optional()
        .map_err(Error::from)
}

/// Map a database row to an [Account].
pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        balance: get_decimal(row, 2)?,
        is_default: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{Error, db::initialize};

    use super::{Account, create_account, get_account, get_default_account};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn account(id: &str, name: &str, is_default: bool) -> Account {
        Account {
            id: id.to_owned(),
            name: name.to_owned(),
            balance: dec!(1234.56),
            is_default,
        }
    }

    #[test]
    fn create_and_get_account() {
        let conn = get_test_connection();
        let want = account("checking", "Checking", false);

        create_account(&want, &conn).expect("could not create account");
        let got = get_account("checking", &conn);

        assert_eq!(got, Ok(want));
    }

    #[test]
    fn get_missing_account_returns_not_found() {
        let conn = get_test_connection();

        let got = get_account("missing", &conn);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn create_fails_on_duplicate_id() {
        let conn = get_test_connection();
        create_account(&account("checking", "Checking", false), &conn).unwrap();

        let got = create_account(&account("checking", "Savings", false), &conn);

        assert!(
            matches!(got, Err(Error::SqlError(_))),
            "want SQL error, got {got:?}"
        );
    }

    #[test]
    fn default_account_is_preferred() {
        let conn = get_test_connection();
        create_account(&account("a", "Alpha", false), &conn).unwrap();
        create_account(&account("z", "Zulu", true), &conn).unwrap();

        let got = get_default_account(&conn).unwrap();

        assert_eq!(got.map(|account| account.id), Some("z".to_owned()));
    }

    #[test]
    fn first_account_by_name_without_default() {
        let conn = get_test_connection();
        create_account(&account("z", "Zulu", false), &conn).unwrap();
        create_account(&account("a", "Alpha", false), &conn).unwrap();

        let got = get_default_account(&conn).unwrap();

        assert_eq!(got.map(|account| account.id), Some("a".to_owned()));
    }

    #[test]
    fn no_default_account_without_accounts() {
        let conn = get_test_connection();

        assert_eq!(get_default_account(&conn), Ok(None));
    }
}
