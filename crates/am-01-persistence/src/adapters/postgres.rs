//! Supabase / Postgres backend.
//!
//! Each collection is one table `(id TEXT PRIMARY KEY, doc JSONB, created_at,
//! updated_at)`. Filters translate to JSONB predicates; `patch_if` is a single
//! conditional `UPDATE ... RETURNING`, so concurrent claims serialize on the
//! row lock and exactly one observes the guard as satisfied.

use crate::domain::{Document, Filter, Patch, StoreError};
use crate::ports::outbound::RecordStore;
use async_trait::async_trait;
use serde_json::Value;
use shared_types::Collection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

const BACKEND: &str = "postgres";
const URL_HINT: &str = "set DATABASE_URL or SUPABASE_DB_URL to a reachable Postgres instance";

/// Connection settings.
#[derive(Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

// The URL carries credentials; never print it.
impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}

/// Postgres-backed document store.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a connection pool.
    ///
    /// ## Errors
    ///
    /// - `BackendUnavailable`: URL missing or the server cannot be reached
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StoreError> {
        if config.url.trim().is_empty() {
            return Err(StoreError::unavailable(BACKEND, "no database URL configured", URL_HINT));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("[am-01] Postgres connection failed (hint: {})", URL_HINT);
                StoreError::unavailable(BACKEND, redact(&e), URL_HINT)
            })?;

        info!(
            "[am-01] Connected to Postgres (max_connections={})",
            config.max_connections
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create collection tables and lookup indexes if absent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for collection in Collection::ALL {
            let table = collection.table_name();
            let ddl = format!(
                "CREATE TABLE IF NOT EXISTS {table} (\
                   id TEXT PRIMARY KEY, \
                   doc JSONB NOT NULL, \
                   created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
                   updated_at TIMESTAMPTZ NOT NULL DEFAULT now())"
            );
            sqlx::query(&ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx(&e))?;

            let index = format!(
                "CREATE INDEX IF NOT EXISTS {table}_audit_request_idx \
                 ON {table} ((doc->>'auditRequestId'))"
            );
            sqlx::query(&index)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx(&e))?;
        }
        debug!("[am-01] Postgres schema ready ({} tables)", Collection::ALL.len());
        Ok(())
    }

    async fn exists(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let sql = format!("SELECT 1 FROM {} WHERE id = $1", collection.table_name());
        let row: Option<i32> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx(&e))?;
        Ok(row.is_some())
    }

    async fn fetch_docs(
        &self,
        sql: &str,
        id: Option<&str>,
        args: Vec<SqlArg>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut query = sqlx::query_scalar::<_, Json<Value>>(sql);
        if let Some(id) = id {
            query = query.bind(id.to_string());
        }
        for arg in args {
            query = match arg {
                SqlArg::Json(value) => query.bind(Json(value)),
                SqlArg::Text(text) => query.bind(text),
                SqlArg::TextArray(items) => query.bind(items),
            };
        }
        let rows = query.fetch_all(&self.pool).await.map_err(|e| map_sqlx(&e))?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| map_sqlx(&e))
    }

    async fn insert(
        &self,
        collection: Collection,
        id: &str,
        doc: Document,
    ) -> Result<Document, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING RETURNING doc",
            collection.table_name()
        );
        let stored = self.fetch_docs(&sql, Some(id), vec![SqlArg::Json(doc)]).await?;
        stored.into_iter().next().ok_or_else(|| StoreError::AlreadyExists {
            collection,
            id: id.to_string(),
        })
    }

    async fn fetch(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let sql = format!("SELECT doc FROM {} WHERE id = $1", collection.table_name());
        Ok(self.fetch_docs(&sql, Some(id), Vec::new()).await?.into_iter().next())
    }

    async fn patch(
        &self,
        collection: Collection,
        id: &str,
        patch: Patch,
    ) -> Result<Document, StoreError> {
        let sql = format!(
            "UPDATE {} SET doc = doc || $2, updated_at = now() WHERE id = $1 RETURNING doc",
            collection.table_name()
        );
        let updated = self
            .fetch_docs(&sql, Some(id), vec![SqlArg::Json(Value::Object(patch))])
            .await?;
        updated
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn patch_if(
        &self,
        collection: Collection,
        id: &str,
        guards: &[Filter],
        patch: Patch,
    ) -> Result<Option<Document>, StoreError> {
        let (clause, mut args) = where_clause(guards, 3)?;
        let sql = format!(
            "UPDATE {} SET doc = doc || $2, updated_at = now() WHERE id = $1 AND {} RETURNING doc",
            collection.table_name(),
            clause
        );
        args.insert(0, SqlArg::Json(Value::Object(patch)));

        let updated = self.fetch_docs(&sql, Some(id), args).await?;
        if let Some(doc) = updated.into_iter().next() {
            return Ok(Some(doc));
        }

        // Zero rows: either the id is unknown or a guard failed.
        if self.exists(collection, id).await? {
            Ok(None)
        } else {
            Err(StoreError::not_found(collection, id))
        }
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table_name());
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx(&e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        let (clause, args) = where_clause(filters, 1)?;
        let sql = format!(
            "SELECT doc FROM {} WHERE {} ORDER BY created_at, id",
            collection.table_name(),
            clause
        );
        self.fetch_docs(&sql, None, args).await
    }
}

/// A positional bind value.
#[derive(Debug, Clone, PartialEq)]
enum SqlArg {
    Json(Value),
    Text(String),
    TextArray(Vec<String>),
}

/// Translate filters into a `WHERE` body with placeholders from `$first`.
///
/// Field names are inlined as string literals, so only identifier
/// characters are accepted.
fn where_clause(filters: &[Filter], first: usize) -> Result<(String, Vec<SqlArg>), StoreError> {
    if filters.is_empty() {
        return Ok(("TRUE".to_string(), Vec::new()));
    }

    let mut parts = Vec::with_capacity(filters.len());
    let mut args = Vec::with_capacity(filters.len());

    for (offset, filter) in filters.iter().enumerate() {
        let field = field_literal(filter.field())?;
        let n = first + offset;
        let (part, arg) = match filter {
            Filter::Eq { value, .. } => (
                format!("doc->{field} = ${n}"),
                SqlArg::Json(value.clone()),
            ),
            Filter::EqIgnoreCase { value, .. } => (
                format!("lower(doc->>{field}) = ${n}"),
                SqlArg::Text(value.to_lowercase()),
            ),
            Filter::AnyOf { values, .. } => (
                format!("doc ? {field} AND ${n} @> jsonb_build_array(doc->{field})"),
                SqlArg::Json(Value::Array(values.clone())),
            ),
            Filter::AnyOfIgnoreCase { values, .. } => (
                format!("lower(doc->>{field}) = ANY(${n})"),
                SqlArg::TextArray(values.iter().map(|v| v.to_lowercase()).collect()),
            ),
            Filter::Contains { value, .. } => (
                format!("jsonb_typeof(doc->{field}) = 'array' AND doc->{field} @> ${n}"),
                SqlArg::Json(Value::Array(vec![value.clone()])),
            ),
        };
        parts.push(format!("({part})"));
        args.push(arg);
    }

    Ok((parts.join(" AND "), args))
}

fn field_literal(field: &str) -> Result<String, StoreError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(StoreError::backend(
            BACKEND,
            format!("invalid filter field '{field}'"),
        ));
    }
    Ok(format!("'{field}'"))
}

fn map_sqlx(err: &sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::unavailable(BACKEND, redact(err), URL_HINT),
        other => StoreError::backend(BACKEND, redact(other)),
    }
}

/// Error text without connection-string details.
fn redact(err: &sqlx::Error) -> String {
    match err {
        sqlx::Error::Configuration(_) => "invalid connection configuration".to_string(),
        sqlx::Error::Database(db) => db.message().to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_filters_match_everything() {
        let (clause, args) = where_clause(&[], 1).unwrap();
        assert_eq!(clause, "TRUE");
        assert!(args.is_empty());
    }

    #[test]
    fn test_placeholders_start_at_offset() {
        let filters = [
            Filter::eq_ignore_case("status", "Available"),
            Filter::contains("tags", "defi"),
        ];
        let (clause, args) = where_clause(&filters, 3).unwrap();
        assert_eq!(
            clause,
            "(lower(doc->>'status') = $3) AND \
             (jsonb_typeof(doc->'tags') = 'array' AND doc->'tags' @> $4)"
        );
        assert_eq!(
            args,
            vec![
                SqlArg::Text("available".into()),
                SqlArg::Json(json!(["defi"])),
            ]
        );
    }

    #[test]
    fn test_any_of_ignore_case_lowercases_values() {
        let guard = [Filter::any_of_ignore_case("status", ["Available", "In Progress"])];
        let (clause, args) = where_clause(&guard, 3).unwrap();
        assert_eq!(clause, "(lower(doc->>'status') = ANY($3))");
        assert_eq!(
            args,
            vec![SqlArg::TextArray(vec!["available".into(), "in progress".into()])]
        );
    }

    #[test]
    fn test_any_of_uses_json_containment() {
        let (clause, args) =
            where_clause(&[Filter::any_of("auditRequestId", ["r1", "r2"])], 1).unwrap();
        assert!(clause.contains("$1 @> jsonb_build_array(doc->'auditRequestId')"));
        assert_eq!(args, vec![SqlArg::Json(json!(["r1", "r2"]))]);
    }

    #[test]
    fn test_rejects_unsafe_field_names() {
        let err = where_clause(&[Filter::eq("status'; DROP TABLE x; --", "a")], 1).unwrap_err();
        assert!(matches!(err, StoreError::Backend { .. }));
    }

    #[test]
    fn test_config_debug_hides_url() {
        let config = PostgresConfig::new("postgres://user:secret@db/app");
        assert!(!format!("{config:?}").contains("secret"));
    }
}
