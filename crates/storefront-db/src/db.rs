//! Database connection and query execution.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use serde::de::DeserializeOwned;

use crate::{DbError, QueryResult, Row, Value};

/// Default bound on lock waits and SQLite busy handling.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Query execution shared by [`Db`] and [`Tx`].
///
/// Implementors only provide raw statement execution; the typed helpers
/// deserialize rows through serde.
pub trait Queryable {
    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Returns the number of rows changed.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, DbError>;

    /// Execute an INSERT and return the new row id.
    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, DbError>;

    /// Execute a SQL query and return raw results.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = db.query("SELECT * FROM products WHERE price < ?", params![100.0])?;
    /// for row in result.iter() {
    ///     let name = row.get("name").and_then(|v| v.as_text());
    ///     println!("Product: {:?}", name);
    /// }
    /// ```
    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError>;

    /// Execute a SQL query and deserialize results into a vector.
    fn query_as<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<Vec<T>, DbError> {
        self.query(sql, params)?.deserialize_all()
    }

    /// Execute a SQL query and return a single row.
    ///
    /// Returns [`DbError::NotFound`] if no rows are returned.
    fn query_one<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<T, DbError> {
        let result = self.query(sql, params)?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a SQL query and return an optional single row.
    fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError> {
        let result = self.query(sql, params)?;
        match result.first() {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Return the first column of the first row, if any.
    fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<Value>, DbError> {
        let result = self.query(sql, params)?;
        Ok(result.first().and_then(|row| row.get_index(0)).cloned())
    }
}

/// SQLite database handle.
///
/// Cloning is cheap; clones share one connection. Every access waits at most
/// the configured timeout for the connection before failing with
/// [`DbError::Busy`].
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
    timeout: Duration,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db").field("timeout", &self.timeout).finish()
    }
}

impl Db {
    /// Open (or create) a database file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db = Db::open("storefront.db")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| DbError::OpenError(format!("{}: {}", path.display(), e)))?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory().map_err(|e| DbError::OpenError(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(DEFAULT_TIMEOUT)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the bound on connection lock waits and SQLite busy retries.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, DbError> {
        self.lock()?.busy_timeout(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    /// The configured lock/busy timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute several `;`-separated statements (schema scripts).
    pub fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    /// Run `f` inside an immediate transaction.
    ///
    /// The write lock is taken when the transaction begins, so reads made
    /// inside `f` cannot be invalidated by another writer before commit.
    /// Commits when `f` returns `Ok`; rolls back on `Err` (and on unwind,
    /// when the transaction is dropped).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let id = db.transaction(|tx| {
    ///     let id = tx.insert("INSERT INTO t (v) VALUES (?)", params![1])?;
    ///     tx.execute("UPDATE totals SET n = n + 1", params![])?;
    ///     Ok::<_, DbError>(id)
    /// })?;
    /// ```
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Tx<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut guard = self.lock().map_err(E::from)?;
        let tx = guard
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| E::from(DbError::from(e)))?;

        let value = f(&Tx { conn: &*tx })?;
        tx.commit().map_err(|e| E::from(DbError::from(e)))?;
        Ok(value)
    }

    /// Check the connection answers a trivial query.
    pub fn ping(&self) -> Result<(), DbError> {
        self.query_scalar("SELECT 1", &[]).map(|_| ())
    }

    fn lock(&self) -> Result<parking_lot::MutexGuard<'_, Connection>, DbError> {
        self.conn.try_lock_for(self.timeout).ok_or_else(|| {
            DbError::Busy(format!("connection lock not acquired within {:?}", self.timeout))
        })
    }
}

impl Queryable for Db {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, DbError> {
        let conn = self.lock()?;
        run_execute(&conn, sql, params)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, DbError> {
        let conn = self.lock()?;
        run_execute(&conn, sql, params)?;
        Ok(conn.last_insert_rowid())
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let conn = self.lock()?;
        run_query(&conn, sql, params)
    }
}

/// An open transaction, handed to the closure given to [`Db::transaction`].
pub struct Tx<'a> {
    conn: &'a Connection,
}

impl Queryable for Tx<'_> {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, DbError> {
        run_execute(self.conn, sql, params)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, DbError> {
        run_execute(self.conn, sql, params)?;
        Ok(self.conn.last_insert_rowid())
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        run_query(self.conn, sql, params)
    }
}

fn run_execute(conn: &Connection, sql: &str, params: &[Value]) -> Result<usize, DbError> {
    let mut stmt = conn.prepare_cached(sql)?;
    Ok(stmt.execute(rusqlite::params_from_iter(params.iter()))?)
}

fn run_query(conn: &Connection, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
    let mut stmt = conn.prepare_cached(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut cursor = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    while let Some(row) = cursor.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            values.push(Value::from(row.get_ref(index)?));
        }
        rows.push(Row::new(columns.clone(), values));
    }

    Ok(QueryResult::new(columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: i64,
        name: String,
        price: f64,
    }

    fn create_test_db() -> Db {
        let db = Db::open_in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE items (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                price REAL NOT NULL CHECK (price > 0)
            );",
        )
        .unwrap();
        db
    }

    #[test]
    fn test_insert_and_query_as() {
        let db = create_test_db();
        let id = db
            .insert("INSERT INTO items (name, price) VALUES (?, ?)", params!["Speaker", 49.5])
            .unwrap();
        assert_eq!(id, 1);

        let items: Vec<Item> = db.query_as("SELECT id, name, price FROM items", &[]).unwrap();
        assert_eq!(
            items,
            vec![Item {
                id: 1,
                name: "Speaker".into(),
                price: 49.5
            }]
        );
    }

    #[test]
    fn test_query_one_not_found() {
        let db = create_test_db();
        let result: Result<Item, DbError> =
            db.query_one("SELECT id, name, price FROM items WHERE id = ?", params![42]);
        assert!(matches!(result, Err(DbError::NotFound)));

        let missing: Option<Item> = db
            .query_optional("SELECT id, name, price FROM items WHERE id = ?", params![42])
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_execute_reports_changed_rows() {
        let db = create_test_db();
        db.execute("INSERT INTO items (name, price) VALUES (?, ?)", params!["A", 1.0])
            .unwrap();
        db.execute("INSERT INTO items (name, price) VALUES (?, ?)", params!["B", 2.0])
            .unwrap();

        let changed = db.execute("UPDATE items SET price = price * 2", &[]).unwrap();
        assert_eq!(changed, 2);
    }

    #[test]
    fn test_constraint_violation_is_classified() {
        let db = create_test_db();
        let err = db
            .execute("INSERT INTO items (name, price) VALUES (?, ?)", params!["Free", 0.0])
            .unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
    }

    #[test]
    fn test_transaction_commits() {
        let db = create_test_db();
        let id = db
            .transaction(|tx| {
                let id = tx.insert("INSERT INTO items (name, price) VALUES (?, ?)", params!["A", 1.0])?;
                tx.execute("UPDATE items SET name = ? WHERE id = ?", params!["Renamed", id])?;
                Ok::<_, DbError>(id)
            })
            .unwrap();

        let name = db
            .query_scalar("SELECT name FROM items WHERE id = ?", params![id])
            .unwrap();
        assert_eq!(name, Some(Value::Text("Renamed".into())));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = create_test_db();
        let result = db.transaction(|tx| {
            tx.execute("INSERT INTO items (name, price) VALUES (?, ?)", params!["A", 1.0])?;
            tx.execute("INSERT INTO items (name, price) VALUES (?, ?)", params!["B", -1.0])?;
            Ok::<_, DbError>(())
        });
        assert!(result.is_err());

        let count = db.query_scalar("SELECT COUNT(*) FROM items", &[]).unwrap();
        assert_eq!(count, Some(Value::Integer(0)));
    }

    #[test]
    fn test_busy_file_database_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("busy.db");

        let writer = Db::open(&path).unwrap();
        writer
            .execute_batch("CREATE TABLE t (v INTEGER); BEGIN IMMEDIATE; INSERT INTO t VALUES (1);")
            .unwrap();

        let other = Db::open(&path)
            .unwrap()
            .with_timeout(Duration::from_millis(50))
            .unwrap();
        let err = other
            .transaction(|tx| tx.execute("INSERT INTO t VALUES (2)", &[]))
            .unwrap_err();
        assert!(err.is_busy());

        writer.execute_batch("COMMIT;").unwrap();
    }

    #[test]
    fn test_ping() {
        let db = Db::open_in_memory().unwrap();
        assert!(db.ping().is_ok());
    }
}
