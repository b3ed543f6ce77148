//! Type-safe SQLite database layer for the storefront services.
//!
//! Wraps a single `rusqlite` connection with a small, ergonomic API and
//! serde-based row deserialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_db::{params, Db, Queryable};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Product {
//!     id: i64,
//!     name: String,
//!     price: f64,
//! }
//!
//! let db = Db::open("storefront.db")?;
//!
//! db.execute(
//!     "INSERT INTO products (name, price) VALUES (?, ?)",
//!     params!["Smart Speaker", 49.99],
//! )?;
//!
//! let products: Vec<Product> = db.query_as(
//!     "SELECT id, name, price FROM products WHERE price < ?",
//!     params![100.0],
//! )?;
//!
//! // Writes that must see a consistent snapshot run inside a transaction.
//! db.transaction(|tx| {
//!     tx.execute("UPDATE products SET stock = stock - 1 WHERE id = ?", params![1])?;
//!     Ok::<_, storefront_db::DbError>(())
//! })?;
//! ```

mod db;
mod error;
mod types;

pub use db::{Db, Queryable, Tx, DEFAULT_TIMEOUT};
pub use error::DbError;
pub use types::{sqlite_bool, QueryResult, Row, Value};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{params, Db, DbError, QueryResult, Queryable, Row, Tx, Value};
}

/// Create a parameter list for SQL queries.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_db::params;
///
/// let params = params!["value1", 42, 3.14];
/// ```
#[macro_export]
macro_rules! params {
    () => {
        &[]
    };
    ($($param:expr),+ $(,)?) => {
        &[$($crate::Value::from($param)),+]
    };
}
