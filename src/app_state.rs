//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    transaction::{DeleteCoordinator, SqliteTransactionStore},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
    /// Runs transaction deletes one at a time across all requests.
    pub delete_coordinator: Arc<DeleteCoordinator<SqliteTransactionStore>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let db_connection = Arc::new(Mutex::new(db_connection));
        let store = SqliteTransactionStore::new(db_connection.clone());

        Ok(Self {
            db_connection,
            delete_coordinator: Arc::new(DeleteCoordinator::new(store)),
        })
    }
}
