//! Airtable backend.
//!
//! One Airtable table per collection, named by `Collection::display_name`.
//! Our record id lives in an `id` field; Airtable's own record id is only
//! used to address rows for update and delete.
//!
//! Airtable fields are flat, so nested objects and arrays of non-strings are
//! written as JSON text and decoded on read. Queries push a
//! `filterByFormula` to the server and then re-check every row with
//! [`matches_all`], so results agree with the other backends.
//!
//! There is no conditional write in the Airtable API: `patch_if` is
//! read-check-write and is not race-free.

use super::apply_patch;
use crate::domain::{matches_all, Document, Filter, Patch, StoreError};
use crate::ports::outbound::RecordStore;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use shared_types::{fields, Collection};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

const BACKEND: &str = "airtable";
const CREDENTIALS_HINT: &str = "set AIRTABLE_API_KEY and AIRTABLE_BASE_ID";

/// Connection settings.
#[derive(Clone)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub api_url: String,
    pub timeout: Duration,
}

impl AirtableConfig {
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            api_url: "https://api.airtable.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AirtableConfig")
            .field("api_key", &"<redacted>")
            .field("base_id", &self.base_id)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AirtableRecord {
    id: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    records: Vec<AirtableRecord>,
    offset: Option<String>,
}

/// Airtable-backed document store.
pub struct AirtableStore {
    client: Client,
    config: AirtableConfig,
}

impl AirtableStore {
    /// Build a client.
    ///
    /// ## Errors
    ///
    /// - `BackendUnavailable`: credentials missing or client construction failed
    pub fn new(config: AirtableConfig) -> Result<Self, StoreError> {
        if config.api_key.trim().is_empty() || config.base_id.trim().is_empty() {
            warn!("[am-01] Airtable credentials missing (hint: {})", CREDENTIALS_HINT);
            return Err(StoreError::unavailable(
                BACKEND,
                "missing API key or base id",
                CREDENTIALS_HINT,
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| StoreError::unavailable(BACKEND, e.to_string(), CREDENTIALS_HINT))?;

        Ok(Self { client, config })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!(
            "{}/v0/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.base_id,
            collection.display_name().replace(' ', "%20")
        )
    }

    async fn list(
        &self,
        collection: Collection,
        formula: Option<String>,
    ) -> Result<Vec<AirtableRecord>, StoreError> {
        let url = self.table_url(collection);
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        loop {
            let mut params: Vec<(&str, String)> = Vec::new();
            if let Some(formula) = &formula {
                params.push(("filterByFormula", formula.clone()));
            }
            if let Some(offset) = &offset {
                params.push(("offset", offset.clone()));
            }

            let response = self
                .client
                .get(&url)
                .bearer_auth(&self.config.api_key)
                .query(&params)
                .send()
                .await
                .map_err(map_transport)?;
            let page: ListResponse = decode(response).await?;
            records.extend(page.records);

            match page.offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        debug!(
            "[am-01] Airtable listed {} rows from {}",
            records.len(),
            collection.display_name()
        );
        Ok(records)
    }

    /// Airtable row holding our id, with its decoded document.
    async fn lookup(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<(String, Document)>, StoreError> {
        let filter = [Filter::eq(fields::ID, id)];
        let rows = self.list(collection, Some(formula_for(&filter))).await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.id, decode_fields(row.fields)))
            .find(|(_, doc)| matches_all(&filter, doc)))
    }

    async fn write_fields(
        &self,
        collection: Collection,
        record_id: &str,
        patch: &Patch,
    ) -> Result<Document, StoreError> {
        let url = format!("{}/{}", self.table_url(collection), record_id);
        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "fields": encode_fields(patch, true), "typecast": true }))
            .send()
            .await
            .map_err(map_transport)?;
        let row: AirtableRecord = decode(response).await?;
        Ok(decode_fields(row.fields))
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let response = self
            .client
            .get(self.table_url(Collection::AuditRequests))
            .bearer_auth(&self.config.api_key)
            .query(&[("maxRecords", "1")])
            .send()
            .await
            .map_err(map_transport)?;
        let _: ListResponse = decode(response).await?;
        Ok(())
    }

    async fn insert(
        &self,
        collection: Collection,
        id: &str,
        doc: Document,
    ) -> Result<Document, StoreError> {
        if self.lookup(collection, id).await?.is_some() {
            return Err(StoreError::AlreadyExists {
                collection,
                id: id.to_string(),
            });
        }

        let body = match doc {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::Malformed {
                    collection,
                    message: "document is not an object".to_string(),
                })
            }
        };

        let response = self
            .client
            .post(self.table_url(collection))
            .bearer_auth(&self.config.api_key)
            .json(&json!({ "fields": encode_fields(&body, false), "typecast": true }))
            .send()
            .await
            .map_err(map_transport)?;
        let row: AirtableRecord = decode(response).await?;
        Ok(decode_fields(row.fields))
    }

    async fn fetch(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.lookup(collection, id).await?.map(|(_, doc)| doc))
    }

    async fn patch(
        &self,
        collection: Collection,
        id: &str,
        patch: Patch,
    ) -> Result<Document, StoreError> {
        let (record_id, _) = self
            .lookup(collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        self.write_fields(collection, &record_id, &patch).await
    }

    async fn patch_if(
        &self,
        collection: Collection,
        id: &str,
        guards: &[Filter],
        patch: Patch,
    ) -> Result<Option<Document>, StoreError> {
        let (record_id, mut current) = self
            .lookup(collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        if !matches_all(guards, &current) {
            return Ok(None);
        }

        let written = self.write_fields(collection, &record_id, &patch).await?;
        apply_patch(&mut current, patch);
        // Airtable omits empty fields in responses; overlay onto the merged view.
        Ok(Some(merge(current, written)))
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let (record_id, _) = self
            .lookup(collection, id)
            .await?
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        let url = format!("{}/{}", self.table_url(collection), record_id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(map_transport)?;
        let _: Value = decode(response).await?;
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        let formula = (!filters.is_empty()).then(|| formula_for(filters));
        let rows = self.list(collection, formula).await?;
        Ok(rows
            .into_iter()
            .map(|row| decode_fields(row.fields))
            .filter(|doc| matches_all(filters, doc))
            .collect())
    }
}

fn merge(mut base: Document, overlay: Document) -> Document {
    if let Value::Object(fields) = overlay {
        apply_patch(&mut base, fields);
    }
    base
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status(status, &body));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| StoreError::backend(BACKEND, format!("invalid response: {e}")))
}

fn map_transport(err: reqwest::Error) -> StoreError {
    if err.is_connect() || err.is_timeout() {
        StoreError::unavailable(BACKEND, "cannot reach Airtable API", CREDENTIALS_HINT)
    } else {
        StoreError::backend(BACKEND, err.without_url().to_string())
    }
}

fn map_status(status: StatusCode, body: &str) -> StoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::unavailable(
            BACKEND,
            format!("credentials rejected ({status})"),
            CREDENTIALS_HINT,
        ),
        StatusCode::NOT_FOUND => StoreError::unavailable(
            BACKEND,
            "base or table not found",
            "check AIRTABLE_BASE_ID and that every collection table exists",
        ),
        _ => {
            let snippet: String = body.chars().take(200).collect();
            StoreError::backend(BACKEND, format!("{status}: {snippet}"))
        }
    }
}

/// Flatten a document for Airtable.
///
/// Objects and arrays holding non-strings become JSON text. Nulls are
/// dropped on create and sent as null on update so the cell is cleared.
fn encode_fields(doc: &Map<String, Value>, keep_nulls: bool) -> Map<String, Value> {
    doc.iter()
        .filter(|(_, value)| keep_nulls || !value.is_null())
        .map(|(key, value)| {
            let flat = match value {
                Value::Object(_) => Value::String(value.to_string()),
                Value::Array(items) if !items.iter().all(Value::is_string) => {
                    Value::String(value.to_string())
                }
                other => other.clone(),
            };
            (key.clone(), flat)
        })
        .collect()
}

/// Reverse of [`encode_fields`].
fn decode_fields(fields: Map<String, Value>) -> Document {
    let decoded = fields
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(text) if text.starts_with('{') || text.starts_with('[') => {
                    match serde_json::from_str::<Value>(&text) {
                        Ok(parsed @ (Value::Object(_) | Value::Array(_))) => parsed,
                        _ => Value::String(text),
                    }
                }
                other => other,
            };
            (key, value)
        })
        .collect();
    Value::Object(decoded)
}

/// Translate filters into an Airtable formula.
fn formula_for(filters: &[Filter]) -> String {
    let clauses: Vec<String> = filters.iter().map(clause_for).collect();
    match clauses.len() {
        0 => "TRUE()".to_string(),
        1 => clauses.into_iter().collect(),
        _ => format!("AND({})", clauses.join(", ")),
    }
}

fn clause_for(filter: &Filter) -> String {
    let field = format!("{{{}}}", filter.field());
    match filter {
        Filter::Eq { value, .. } => format!("{field} = {}", literal(value)),
        Filter::EqIgnoreCase { value, .. } => {
            format!("LOWER({field}) = {}", quote(&value.to_lowercase()))
        }
        Filter::AnyOf { values, .. } => any(
            values
                .iter()
                .map(|v| format!("{field} = {}", literal(v)))
                .collect(),
        ),
        Filter::AnyOfIgnoreCase { values, .. } => any(
            values
                .iter()
                .map(|v| format!("LOWER({field}) = {}", quote(&v.to_lowercase())))
                .collect(),
        ),
        Filter::Contains { value, .. } => {
            let needle = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "FIND({}, \",\" & ARRAYJOIN({field}, \",\") & \",\") > 0",
                quote(&format!(",{needle},"))
            )
        }
    }
}

fn any(clauses: Vec<String>) -> String {
    match clauses.len() {
        0 => "FALSE()".to_string(),
        1 => clauses.into_iter().collect(),
        _ => format!("OR({})", clauses.join(", ")),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => quote(s),
        Value::Bool(true) => "TRUE()".to_string(),
        Value::Bool(false) => "FALSE()".to_string(),
        Value::Null => "BLANK()".to_string(),
        other => other.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
