//! In-memory lookup backend for development and tests

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::{value_as_text, LookupError, UniqueLookup, UniqueQuery};

#[derive(Debug, Default)]
struct Table {
    columns: BTreeSet<String>,
    rows: Vec<Map<String, Value>>,
}

/// Lookup backed by rows held in memory
///
/// Values are compared as text, like the Postgres backend does. Counting
/// against a table or column that was never defined is an error.
#[derive(Debug, Default)]
pub struct InMemoryLookup {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryLookup {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a table and its columns without inserting rows
    pub fn define_table(&self, table: &str, columns: &[&str]) {
        let mut tables = self.tables.write();
        let entry = tables.entry(table.to_string()).or_default();
        entry
            .columns
            .extend(columns.iter().map(ToString::to_string));
    }

    /// Insert a row; its keys become known columns of the table
    ///
    /// Non-object values are ignored.
    pub fn insert(&self, table: &str, row: Value) {
        let Value::Object(row) = row else {
            return;
        };
        let mut tables = self.tables.write();
        let entry = tables.entry(table.to_string()).or_default();
        entry.columns.extend(row.keys().cloned());
        entry.rows.push(row);
    }
}

#[async_trait]
impl UniqueLookup for InMemoryLookup {
    async fn count(&self, query: &UniqueQuery) -> Result<u64, LookupError> {
        let tables = self.tables.read();
        let unknown = |column: &str| LookupError::UnknownTarget {
            table: query.table.clone(),
            column: column.to_string(),
        };

        let table = tables
            .get(&query.table)
            .ok_or_else(|| unknown(&query.column))?;
        if !table.columns.contains(&query.column) {
            return Err(unknown(&query.column));
        }
        if let Some((column, _)) = &query.exclude {
            if !table.columns.contains(column) {
                return Err(unknown(column));
            }
        }

        let wanted = value_as_text(&query.value);
        let excluded = query
            .exclude
            .as_ref()
            .map(|(column, value)| (column.as_str(), value_as_text(value)));

        let count = table
            .rows
            .iter()
            .filter(|row| row.get(&query.column).map(value_as_text).as_deref() == Some(wanted.as_str()))
            .filter(|row| {
                excluded.as_ref().is_none_or(|(column, value)| {
                    row.get(*column).map(value_as_text).as_deref() != Some(value.as_str())
                })
            })
            .count();

        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }
}
