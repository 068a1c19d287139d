//! Uniqueness lookups against the backing store
//!
//! The validator never talks to a database directly. It builds a
//! [`UniqueQuery`] and asks a [`UniqueLookup`] how many rows match.
//!
//! # Examples
//!
//! ```rust
//! use acton_admin::lookup::{InMemoryLookup, UniqueLookup, UniqueQuery};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), acton_admin::lookup::LookupError> {
//! let lookup = InMemoryLookup::new();
//! lookup.insert("users", json!({"id": 1, "email": "a@x.com"}));
//!
//! let query = UniqueQuery {
//!     table: "users".into(),
//!     column: "email".into(),
//!     value: json!("a@x.com"),
//!     exclude: Some(("id".into(), json!(1))),
//! };
//! assert_eq!(lookup.count(&query).await?, 0);
//! # Ok(())
//! # }
//! ```

mod memory;
mod postgres;

pub use memory::InMemoryLookup;
pub use postgres::PgUniqueLookup;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Rows to count for a uniqueness check
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueQuery {
    /// Table to search
    pub table: String,
    /// Column compared against `value`
    pub column: String,
    /// Submitted value
    pub value: Value,
    /// Column and value of a row to leave out
    pub exclude: Option<(String, Value)>,
}

/// Lookup failures
///
/// These point at a rule that references something the store does not have,
/// or at the store itself; they are never shown to the user as a validation
/// message.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The rule names a table or column the store does not know
    #[error("unknown lookup target {table}.{column}")]
    UnknownTarget {
        /// Table name from the rule
        table: String,
        /// Column name from the rule
        column: String,
    },

    /// A table or column name is not a plain SQL identifier
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The database rejected the query
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Counts rows holding a value
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UniqueLookup: Send + Sync {
    /// Number of rows where `query.column` equals `query.value`, minus the excluded row
    ///
    /// # Errors
    ///
    /// Returns an error if the table or column does not exist or the store fails.
    async fn count(&self, query: &UniqueQuery) -> Result<u64, LookupError>;
}

/// Render a scalar the way it is compared as text
pub(crate) fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
