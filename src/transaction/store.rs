//! Deletes transactions from the SQLite database.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::{Error, account::AccountId, db::get_decimal};

use super::{
    bulk_delete::DeleteTransactions,
    core::{TransactionId, TransactionKind},
};

/// A [DeleteTransactions] store backed by the application database.
///
/// Deleting a transaction reverts its effect on the balance of its account.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    db_connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a store that uses `db_connection`.
    pub fn new(db_connection: Arc<Mutex<Connection>>) -> Self {
        Self { db_connection }
    }
}

#[async_trait::async_trait]
impl DeleteTransactions for SqliteTransactionStore {
    async fn delete_transactions(
        &self,
        ids: &[TransactionId],
        account_id: Option<&AccountId>,
    ) -> Result<usize, Error> {
        let mut connection = self
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        delete_transactions(ids, account_id.map(String::as_str), &mut connection)
    }
}

/// Delete the transactions `ids` in a single SQL transaction and revert their
/// effect on the account balances.
///
/// Transactions that do not exist, or that belong to an account other than
/// `account_id` when it is given, are skipped.
fn delete_transactions(
    ids: &[TransactionId],
    account_id: Option<&str>,
    connection: &mut Connection,
) -> Result<usize, Error> {
    let sql_transaction = connection.transaction()?;
    let mut balance_changes: HashMap<AccountId, Decimal> = HashMap::new();
    let mut deleted = 0;

    for id in ids {
        let Some((amount, kind, owner)) = sql_transaction
            .query_row(
                "SELECT amount, kind, account_id FROM \"transaction\" WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        get_decimal(row, 0)?,
                        row.get::<_, TransactionKind>(1)?,
                        row.get::<_, AccountId>(2)?,
                    ))
                },
            )
            .optional()?
        else {
            tracing::debug!("skipping missing transaction {id}");
            continue;
        };

        if account_id.is_some_and(|account_id| account_id != owner) {
            tracing::warn!("skipping transaction {id} because it belongs to account {owner}");
            continue;
        }

        deleted += sql_transaction.execute("DELETE FROM \"transaction\" WHERE id = ?1", params![id])?;
        *balance_changes.entry(owner).or_default() += kind.balance_effect(amount);
    }

    for (owner, change) in balance_changes {
        let balance = sql_transaction.query_row(
            "SELECT balance FROM account WHERE id = ?1",
            params![owner],
            |row| get_decimal(row, 0),
        )?;

        sql_transaction.execute(
            "UPDATE account SET balance = ?1 WHERE id = ?2",
            params![(balance - change).to_string(), owner],
        )?;
    }

    sql_transaction.commit()?;
    tracing::info!("deleted {deleted} transactions");

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        Error,
        account::{Account, create_account, get_account},
        db::initialize,
        transaction::{
            DeleteTransactions, TransactionKind, TransactionRecord, create_transaction,
            get_transaction,
        },
    };

    use super::SqliteTransactionStore;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        for (id, name) in [("checking", "Checking"), ("savings", "Savings")] {
            create_account(
                &Account {
                    id: id.to_owned(),
                    name: name.to_owned(),
                    balance: dec!(100),
                    is_default: id == "checking",
                },
                &conn,
            )
            .unwrap();
        }

        let date = datetime!(2024-01-01 0:00 UTC);
        for (id, account_id, kind, amount) in [
            ("1", "checking", TransactionKind::Expense, dec!(20)),
            ("2", "checking", TransactionKind::Income, dec!(50)),
            ("3", "savings", TransactionKind::Expense, dec!(10)),
        ] {
            create_transaction(
                &TransactionRecord::build(id, account_id, kind, amount, date).finish(),
                &conn,
            )
            .unwrap();
        }

        conn
    }

    fn get_store() -> SqliteTransactionStore {
        SqliteTransactionStore::new(Arc::new(Mutex::new(get_test_connection())))
    }

    #[tokio::test]
    async fn deletes_transactions_and_reverts_balance() {
        let store = get_store();

        let got = store
            .delete_transactions(&["1".to_owned(), "2".to_owned()], Some(&"checking".to_owned()))
            .await;

        assert_eq!(got, Ok(2));
        let connection = store.db_connection.lock().unwrap();
        assert_eq!(get_transaction("1", &connection), Err(Error::NotFound));
        assert_eq!(get_transaction("2", &connection), Err(Error::NotFound));
        // 100 - 20 + 50 before the delete.
        assert_eq!(get_account("checking", &connection).unwrap().balance, dec!(100));
    }

    #[tokio::test]
    async fn skips_missing_transactions() {
        let store = get_store();

        let got = store
            .delete_transactions(&["1".to_owned(), "missing".to_owned()], None)
            .await;

        assert_eq!(got, Ok(1));
        let connection = store.db_connection.lock().unwrap();
        assert_eq!(get_account("checking", &connection).unwrap().balance, dec!(150));
    }

    #[tokio::test]
    async fn skips_transactions_of_other_accounts() {
        let store = get_store();

        let got = store
            .delete_transactions(&["1".to_owned(), "3".to_owned()], Some(&"checking".to_owned()))
            .await;

        assert_eq!(got, Ok(1));
        let connection = store.db_connection.lock().unwrap();
        assert!(get_transaction("3", &connection).is_ok());
        assert_eq!(get_account("savings", &connection).unwrap().balance, dec!(90));
    }

    #[tokio::test]
    async fn without_account_deletes_across_accounts() {
        let store = get_store();

        let got = store
            .delete_transactions(&["2".to_owned(), "3".to_owned()], None)
            .await;

        assert_eq!(got, Ok(2));
        let connection = store.db_connection.lock().unwrap();
        assert_eq!(get_account("checking", &connection).unwrap().balance, dec!(80));
        assert_eq!(get_account("savings", &connection).unwrap().balance, dec!(100));
    }

    #[tokio::test]
    async fn empty_ids_delete_nothing() {
        let store = get_store();

        let got = store.delete_transactions(&[], None).await;

        assert_eq!(got, Ok(0));
    }
}
