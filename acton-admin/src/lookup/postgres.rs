//! Postgres lookup backend
//!
//! Table and column names cannot be bound as parameters, so they are checked
//! against a plain-identifier pattern and quoted before being interpolated.
//! Values are bound and compared as text.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::PgPool;

use super::{value_as_text, LookupError, UniqueLookup, UniqueQuery};

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier pattern is valid")
});

/// Lookup issuing `COUNT(*)` queries through a sqlx pool
#[derive(Debug, Clone)]
pub struct PgUniqueLookup {
    pool: PgPool,
}

impl PgUniqueLookup {
    /// Wrap an existing pool
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Quote a (possibly schema-qualified) identifier
fn quote_identifier(name: &str) -> Result<String, LookupError> {
    if !IDENTIFIER.is_match(name) {
        return Err(LookupError::InvalidIdentifier(name.to_string()));
    }
    Ok(name
        .split('.')
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join("."))
}

/// SQL for `query`; `$1` is the value, `$2` the excluded value if any
fn count_sql(query: &UniqueQuery) -> Result<String, LookupError> {
    let table = quote_identifier(&query.table)?;
    let column = quote_identifier(&query.column)?;
    let mut sql = format!("SELECT COUNT(*) FROM {table} WHERE {column}::text = $1");
    if let Some((exclude, _)) = &query.exclude {
        let exclude = quote_identifier(exclude)?;
        sql.push_str(&format!(" AND {exclude}::text IS DISTINCT FROM $2"));
    }
    Ok(sql)
}

#[async_trait]
impl UniqueLookup for PgUniqueLookup {
    async fn count(&self, query: &UniqueQuery) -> Result<u64, LookupError> {
        let sql = count_sql(query)?;
        let mut statement = sqlx::query_scalar::<_, i64>(&sql).bind(value_as_text(&query.value));
        if let Some((_, excluded)) = &query.exclude {
            statement = statement.bind(value_as_text(excluded));
        }

        let count = statement.fetch_one(&self.pool).await.map_err(|err| {
            tracing::error!(
                error = %err,
                table = %query.table,
                column = %query.column,
                "uniqueness lookup failed"
            );
            LookupError::Database(err)
        })?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}
