//! Database set up and helpers shared by the domain models.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::{Error, account::create_account_table, transaction::create_transaction_table};

/// Create the tables for the domain models.
///
/// This function is idempotent, calling it on an already initialised database
/// is a no-op.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction = connection.unchecked_transaction()?;
    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;
    transaction.commit()?;

    Ok(())
}

/// Read a decimal that is stored as text at column `index` of `row`.
///
/// Amounts are stored as text so that no precision is lost to floating point
/// conversion.
pub fn get_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    Decimal::from_str(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use super::{get_decimal, initialize};

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).expect("first initialisation failed");
        initialize(&connection).expect("second initialisation failed");
    }

    #[test]
    fn reads_decimal_text() {
        let connection = Connection::open_in_memory().unwrap();

        let got = connection
            .query_row("SELECT '-1234.50'", [], |row| get_decimal(row, 0))
            .unwrap();

        assert_eq!(got, dec!(-1234.50));
    }

    #[test]
    fn rejects_non_decimal_text() {
        let connection = Connection::open_in_memory().unwrap();

        let got = connection.query_row("SELECT 'twelve'", [], |row| get_decimal(row, 0));

        assert!(
            matches!(got, Err(rusqlite::Error::FromSqlConversionFailure(0, _, _))),
            "want conversion failure, got {got:?}"
        );
    }
}
