//! Defines the core data models and database queries for transactions.

use std::fmt;

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, account::AccountId, db::get_decimal};

// ============================================================================
// MODELS
// ============================================================================

/// The identifier of a transaction.
pub type TransactionId = String;

/// Whether a transaction earned or spent money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money coming into the account.
    Income,
    /// Money leaving the account.
    Expense,
}

impl TransactionKind {
    /// The value used in the database and in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }

    /// The human readable name.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// The change to an account balance caused by a transaction of this kind
    /// with the given `amount`.
    pub fn balance_effect(self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind \"{other}\"").into(),
            )),
        }
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecurringInterval {
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every year.
    Yearly,
}

impl RecurringInterval {
    /// The value used in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "DAILY",
            RecurringInterval::Weekly => "WEEKLY",
            RecurringInterval::Monthly => "MONTHLY",
            RecurringInterval::Yearly => "YEARLY",
        }
    }

    /// The human readable name.
    pub fn label(self) -> &'static str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
        }
    }
}

impl ToSql for RecurringInterval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for RecurringInterval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "DAILY" => Ok(RecurringInterval::Daily),
            "WEEKLY" => Ok(RecurringInterval::Weekly),
            "MONTHLY" => Ok(RecurringInterval::Monthly),
            "YEARLY" => Ok(RecurringInterval::Yearly),
            other => Err(FromSqlError::Other(
                format!("invalid recurring interval \"{other}\"").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `TransactionRecord`, use [TransactionRecord::build].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// The ID of the transaction, unique across all accounts.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: OffsetDateTime,
    /// The amount of money spent or earned.
    ///
    /// Whether the money was spent or earned is given by `kind`, so amounts
    /// are normally positive.
    pub amount: Decimal,
    /// The category key, e.g. "groceries".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: Option<String>,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// Whether the transaction repeats.
    pub is_recurring: bool,
    /// How often the transaction repeats.
    ///
    /// Expected to be set if and only if `is_recurring` is `true`, but this is
    /// not enforced.
    pub recurring_interval: Option<RecurringInterval>,
    /// When the transaction is next expected to repeat.
    pub next_recurring_date: Option<OffsetDateTime>,
    /// The account the transaction belongs to.
    pub account_id: AccountId,
}

impl TransactionRecord {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        id: &str,
        account_id: &str,
        kind: TransactionKind,
        amount: Decimal,
        date: OffsetDateTime,
    ) -> TransactionBuilder {
        TransactionBuilder {
            record: TransactionRecord {
                id: id.to_owned(),
                date,
                amount,
                category: "other-expense".to_owned(),
                description: None,
                kind,
                is_recurring: false,
                recurring_interval: None,
                next_recurring_date: None,
                account_id: account_id.to_owned(),
            },
        }
    }
}

/// A builder for creating [TransactionRecord] instances.
///
/// The optional fields default to: category "other-expense", no description,
/// and not recurring.
///
/// # Examples
///
/// ```ignore
/// use rust_decimal_macros::dec;
/// use time::macros::datetime;
///
/// use crate::transaction::{RecurringInterval, TransactionKind, TransactionRecord};
///
/// let transaction = TransactionRecord::build(
///         "rent-2025-01",
///         "checking",
///         TransactionKind::Expense,
///         dec!(1200.00),
///         datetime!(2025-01-01 0:00 UTC),
///     )
///     .category("housing")
///     .description("Rent")
///     .recurring(RecurringInterval::Monthly)
///     .finish();
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    record: TransactionRecord,
}

impl TransactionBuilder {
    /// Set the category key.
    pub fn category(mut self, category: &str) -> Self {
        self.record.category = category.to_owned();
        self
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.record.description = Some(description.to_owned());
        self
    }

    /// Mark the transaction as repeating every `interval`.
    pub fn recurring(mut self, interval: RecurringInterval) -> Self {
        self.record.is_recurring = true;
        self.record.recurring_interval = Some(interval);
        self
    }

    /// Set when the transaction is next expected to repeat.
    pub fn next_recurring_date(mut self, date: OffsetDateTime) -> Self {
        self.record.next_recurring_date = Some(date);
        self
    }

    /// Create the [TransactionRecord].
    pub fn finish(self) -> TransactionRecord {
        self.record
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Add `transaction` to the database and apply its amount to the balance of
/// its account.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the account does not exist,
/// - or [Error::SqlError] if the ID is already taken or there is some other SQL error.
pub fn create_transaction(
    transaction: &TransactionRecord,
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction = connection.unchecked_transaction()?;

    let balance = sql_transaction.query_row(
        "SELECT balance FROM account WHERE id = ?1",
        params![transaction.account_id],
        |row| get_decimal(row, 0),
    )?;

    sql_transaction.execute(
        "INSERT INTO \"transaction\" (id, date, amount, category, description, kind,
            is_recurring, recurring_interval, next_recurring_date, account_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            transaction.id,
            transaction.date,
            transaction.amount.to_string(),
            transaction.category,
            transaction.description,
            transaction.kind,
            transaction.is_recurring,
            transaction.recurring_interval,
            transaction.next_recurring_date,
            transaction.account_id,
        ],
    )?;

    let balance = balance + transaction.kind.balance_effect(transaction.amount);
    sql_transaction.execute(
        "UPDATE account SET balance = ?1 WHERE id = ?2",
        params![balance.to_string(), transaction.account_id],
    )?;

    sql_transaction.commit()?;

    Ok(())
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_transaction(id: &str, connection: &Connection) -> Result<TransactionRecord, Error> {
    connection
        .query_row(
            "SELECT id, date, amount, category, description, kind, is_recurring,
                recurring_interval, next_recurring_date, account_id
            FROM \"transaction\" WHERE id = ?1",
            params![id],
            map_transaction_row,
        )
        .map_err(Error::from)
}

/// Get the transactions of the account `account_id`, most recent first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_account_transactions(
    account_id: &str,
    connection: &Connection,
) -> Result<Vec<TransactionRecord>, Error> {
    connection
        .prepare(
            "SELECT id, date, amount, category, description, kind, is_recurring,
                recurring_interval, next_recurring_date, account_id
            FROM \"transaction\"
            WHERE account_id = ?1
            ORDER BY date DESC, id ASC",
        )?
        .query_map(params![account_id], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                description TEXT,
                kind TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
                is_recurring INTEGER NOT NULL DEFAULT 0,
                recurring_interval TEXT,
                next_recurring_date TEXT,
                account_id TEXT NOT NULL,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Index used by the account page.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date ON \"transaction\"(account_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [TransactionRecord].
pub fn map_transaction_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: get_decimal(row, 2)?,
        category: row.get(3)?,
        description: row.get(4)?,
        kind: row.get(5)?,
        is_recurring: row.get(6)?,
        recurring_interval: row.get(7)?,
        next_recurring_date: row.get(8)?,
        account_id: row.get(9)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
