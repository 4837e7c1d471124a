//! Database access: one lazily opened SQLite connection plus a repository
//! per table.

use rusqlite::{Connection, OptionalExtension};
use std::cell::{Ref, RefCell};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error};

mod buildings;
mod contractors;
mod departments;
mod jobs;
mod schema;
mod statuses;

pub use buildings::{BuildingRepository, SqliteBuildingRepository};
pub use contractors::{ContractorRepository, SqliteContractorRepository};
pub use departments::{DepartmentRepository, SqliteDepartmentRepository};
pub use jobs::{JobRepository, SqliteJobRepository};
pub use schema::SCHEMA;
pub use statuses::{SqliteStatusRepository, StatusRepository};

/// Name returned by id-to-name lookups that find nothing
pub const UNKNOWN_NAME: &str = "Unknown";

/// Errors from opening or using the database.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The database file could not be opened.
    #[error("Could not open database '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// IO error when creating the database directory.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The connection is already borrowed for a reconnect.
    #[error("Database connection is busy")]
    Busy,
}

#[derive(Debug, Clone)]
enum Target {
    File(PathBuf),
    Memory,
}

/// Owns the single database connection shared by every repository.
///
/// Nothing is opened until the first call to [`ConnectionProvider::connection`].
/// The connection is released by [`ConnectionProvider::close`] or on drop.
pub struct ConnectionProvider {
    target: Target,
    conn: RefCell<Option<Connection>>,
}

impl ConnectionProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            target: Target::File(path.into()),
            conn: RefCell::new(None),
        }
    }

    /// In-memory database, used by tests. Closing it discards all data.
    pub fn in_memory() -> Self {
        Self {
            target: Target::Memory,
            conn: RefCell::new(None),
        }
    }

    /// Return the active connection, opening one if absent or dead.
    ///
    /// Returns `None` (after logging the cause) if the database cannot be
    /// opened; callers treat that as "operation unavailable".
    pub fn connection(&self) -> Option<Ref<'_, Connection>> {
        if !self.is_alive() {
            if let Err(e) = self.reconnect() {
                error!(error = %e, "Error connecting to the database");
                return None;
            }
        }
        Ref::filter_map(self.conn.borrow(), |c| c.as_ref()).ok()
    }

    /// Whether a connection is currently held
    pub fn is_open(&self) -> bool {
        self.conn.borrow().is_some()
    }

    /// Commit the open transaction, if any.
    ///
    /// A failed COMMIT (e.g. `SQLITE_BUSY`) leaves the transaction open;
    /// the caller must roll it back.
    pub fn commit(&self) -> rusqlite::Result<()> {
        self.finish_transaction("COMMIT")
    }

    /// Roll back the open transaction, if any
    pub fn rollback(&self) {
        if let Err(e) = self.finish_transaction("ROLLBACK") {
            error!(error = %e, "Error rolling back transaction");
        }
    }

    /// Drop the connection. Safe to call any number of times.
    pub fn close(&self) {
        let Ok(mut slot) = self.conn.try_borrow_mut() else {
            return;
        };
        if let Some(conn) = slot.take() {
            if let Err((_, e)) = conn.close() {
                error!(error = %e, "Error closing the database connection");
            } else {
                debug!("database connection closed");
            }
        }
    }

    fn is_alive(&self) -> bool {
        match self.conn.borrow().as_ref() {
            // Reads the file header, so a handle that can no longer reach
            // its database fails here
            Some(conn) => conn
                .query_row("PRAGMA schema_version", [], |_| Ok(()))
                .is_ok(),
            None => false,
        }
    }

    fn reconnect(&self) -> Result<(), DbError> {
        let conn = self.open()?;
        let mut slot = self.conn.try_borrow_mut().map_err(|_| DbError::Busy)?;
        *slot = Some(conn);
        Ok(())
    }

    fn open(&self) -> Result<Connection, DbError> {
        let conn = match &self.target {
            Target::Memory => Connection::open_in_memory()?,
            Target::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
                }
                Connection::open(path).map_err(|source| DbError::Open {
                    path: path.clone(),
                    source,
                })?
            }
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(schema::SCHEMA)?;
        debug!(database = ?self.target, "database connection opened");
        Ok(conn)
    }

    fn finish_transaction(&self, statement: &str) -> rusqlite::Result<()> {
        let slot = self.conn.borrow();
        let Some(conn) = slot.as_ref() else {
            return Ok(());
        };
        if conn.is_autocommit() {
            return Ok(());
        }
        conn.execute_batch(statement)
    }
}

/// One repository per table, sharing a single connection provider
pub struct Repositories<'a> {
    pub buildings: Box<dyn BuildingRepository + 'a>,
    pub contractors: Box<dyn ContractorRepository + 'a>,
    pub statuses: Box<dyn StatusRepository + 'a>,
    pub departments: Box<dyn DepartmentRepository + 'a>,
    pub jobs: Box<dyn JobRepository + 'a>,
}

impl<'a> Repositories<'a> {
    pub fn sqlite(db: &'a ConnectionProvider) -> Self {
        Self {
            buildings: Box::new(SqliteBuildingRepository::new(db)),
            contractors: Box::new(SqliteContractorRepository::new(db)),
            statuses: Box::new(SqliteStatusRepository::new(db)),
            departments: Box::new(SqliteDepartmentRepository::new(db)),
            jobs: Box::new(SqliteJobRepository::new(db)),
        }
    }
}

/// Names from a single-column query, or an empty list on any failure
fn query_names(db: &ConnectionProvider, sql: &str, context: &str) -> Vec<String> {
    let Some(conn) = db.connection() else {
        return Vec::new();
    };
    let result = (|| -> rusqlite::Result<Vec<String>> {
        let mut stmt = conn.prepare(sql)?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    })();
    match result {
        Ok(names) => names,
        Err(e) => {
            error!(error = %e, "{}", context);
            Vec::new()
        }
    }
}

/// Id of the first row matching `name`, or `None` if absent or on failure
fn query_id_by_name(db: &ConnectionProvider, sql: &str, name: &str, context: &str) -> Option<i64> {
    let conn = db.connection()?;
    match conn.query_row(sql, [name], |row| row.get(0)).optional() {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, name, "{}", context);
            None
        }
    }
}

/// Name of the row with `id`, or [`UNKNOWN_NAME`] if absent or on failure
fn query_name_by_id(db: &ConnectionProvider, sql: &str, id: i64, context: &str) -> String {
    let Some(conn) = db.connection() else {
        return UNKNOWN_NAME.to_string();
    };
    match conn.query_row(sql, [id], |row| row.get(0)).optional() {
        Ok(Some(name)) => name,
        Ok(None) => UNKNOWN_NAME.to_string(),
        Err(e) => {
            error!(error = %e, id, "{}", context);
            UNKNOWN_NAME.to_string()
        }
    }
}

impl Drop for ConnectionProvider {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Reference rows shared by the repository and flow tests.

    use super::ConnectionProvider;

    pub const TOWER_A: i64 = 1;
    pub const HARBOUR_VIEW: i64 = 2;
    pub const ACME: i64 = 10;
    pub const BRIGHT_SPARKS: i64 = 11;
    pub const PENDING: i64 = 1;
    pub const IN_PROGRESS: i64 = 2;
    pub const COMPLETED: i64 = 3;
    pub const DEPT_1A: i64 = 100;
    pub const DEPT_2B: i64 = 101;

    pub fn seeded() -> ConnectionProvider {
        let db = ConnectionProvider::in_memory();
        seed(&db);
        db
    }

    pub fn seed(db: &ConnectionProvider) {
        let conn = db.connection().unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO buildings (code, name) VALUES (1, 'Tower A'), (2, 'Harbour View');
            INSERT INTO contractors (id, display_name) VALUES (10, 'ACME Elevators'), (11, 'Bright Sparks');
            INSERT INTO statuses (id, name) VALUES (1, 'Pending'), (2, 'In Progress'), (3, 'Completed');
            INSERT INTO departments (id, code, unit, unit_order, name, building_fk) VALUES
                (101, 'A-02', '2B', 5, 'Back flat', 1),
                (100, 'A-01', '1A', 3, 'Front flat', 1),
                (200, 'H-01', 'PH', 1, 'Penthouse', 2);
            "#,
        )
        .unwrap();
    }
}
