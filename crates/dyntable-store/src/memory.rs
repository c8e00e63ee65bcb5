//! In-memory reference implementation of [`StoreClient`].
//!
//! Backs tests and local development. Items are held in an ordered map keyed
//! by `(partition key, sort key)`, which models the backend's sort-key
//! ordering exactly: prefix queries are real range scans, not filters over an
//! unordered set. The update path implements the `SET` expression subset the
//! engine generates, including the existence condition.

use crate::storage_trait::{
    ItemKey, Result, StoreClient, StoreError, UpdateExpression, WriteRequest,
    MAX_BATCH_WRITE_ITEMS,
};
use async_trait::async_trait;
use log::trace;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Key attribute names of one backend table, the equivalent of the remote
/// store's table key schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub partition_attr: String,
    pub sort_attr: String,
}

impl KeySchema {
    pub fn new(partition_attr: impl Into<String>, sort_attr: impl Into<String>) -> Self {
        Self {
            partition_attr: partition_attr.into(),
            sort_attr: sort_attr.into(),
        }
    }
}

struct TableData {
    schema: KeySchema,
    items: BTreeMap<(String, String), Value>,
}

/// In-memory, thread-safe [`StoreClient`] backend.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, TableData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style table creation for test setup.
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        partition_attr: impl Into<String>,
        sort_attr: impl Into<String>,
    ) -> Self {
        let tables = self.tables.get_mut().unwrap_or_else(|e| e.into_inner());
        tables.insert(
            name.into(),
            TableData {
                schema: KeySchema::new(partition_attr, sort_attr),
                items: BTreeMap::new(),
            },
        );
        self
    }

    /// Create a backend table with the given key schema. Idempotent: an
    /// existing table keeps its items.
    pub fn create_table(&self, name: impl Into<String>, schema: KeySchema) -> Result<()> {
        let mut tables = self.write_guard()?;
        tables.entry(name.into()).or_insert_with(|| TableData {
            schema,
            items: BTreeMap::new(),
        });
        Ok(())
    }

    /// Number of items currently stored in a table.
    pub fn item_count(&self, table: &str) -> Result<usize> {
        let tables = self.read_guard()?;
        let data = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(data.items.len())
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, HashMap<String, TableData>>> {
        self.tables
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, TableData>>> {
        self.tables
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

fn extract_key(schema: &KeySchema, item: &Value) -> Result<(String, String)> {
    let pk = item
        .get(&schema.partition_attr)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            StoreError::InvalidKey(format!(
                "item is missing string key attribute '{}'",
                schema.partition_attr
            ))
        })?;
    let sk = item
        .get(&schema.sort_attr)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            StoreError::InvalidKey(format!(
                "item is missing string key attribute '{}'",
                schema.sort_attr
            ))
        })?;
    Ok((pk.to_string(), sk.to_string()))
}

fn resolve_alias<'a>(segment: &'a str, names: &'a BTreeMap<String, String>) -> Result<&'a str> {
    if segment.starts_with('#') {
        names
            .get(segment)
            .map(String::as_str)
            .ok_or_else(|| StoreError::Backend(format!("unbound name alias '{segment}'")))
    } else {
        Ok(segment)
    }
}

/// Apply the `SET path = :slot, ...` expression subset to a stored document.
///
/// Paths address nested objects with `.`; parents must already exist (the
/// update never fabricates structure, matching backend document-path rules).
fn apply_update(doc: &mut Value, update: &UpdateExpression) -> Result<()> {
    let assignments = update
        .expression
        .strip_prefix("SET ")
        .ok_or_else(|| {
            StoreError::Backend(format!(
                "unsupported update expression '{}'",
                update.expression
            ))
        })?;

    for assignment in assignments.split(", ") {
        let (path, slot) = assignment.split_once(" = ").ok_or_else(|| {
            StoreError::Backend(format!("malformed assignment '{assignment}'"))
        })?;
        let value = update
            .values
            .get(slot.trim())
            .ok_or_else(|| StoreError::Backend(format!("unbound value slot '{slot}'")))?;

        let segments: Vec<&str> = path.trim().split('.').collect();
        let mut current = &mut *doc;
        for segment in &segments[..segments.len() - 1] {
            let attr = resolve_alias(segment, &update.names)?;
            current = current.get_mut(attr).ok_or_else(|| {
                StoreError::Backend(format!("document path '{attr}' does not exist"))
            })?;
        }
        let last = resolve_alias(segments[segments.len() - 1], &update.names)?;
        match current {
            Value::Object(map) => {
                map.insert(last.to_string(), value.clone());
            }
            _ => {
                return Err(StoreError::Backend(format!(
                    "document path '{}' is not an object",
                    path.trim()
                )))
            }
        }
    }
    Ok(())
}

#[async_trait]
impl StoreClient for InMemoryStore {
    async fn put_item(&self, table: &str, item: Value) -> Result<()> {
        let mut tables = self.write_guard()?;
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let key = extract_key(&data.schema, &item)?;
        data.items.insert(key, item);
        Ok(())
    }

    async fn get_item(&self, table: &str, key: &ItemKey) -> Result<Option<Value>> {
        let tables = self.read_guard()?;
        let data = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        Ok(data.items.get(&(key.pk.clone(), key.sk.clone())).cloned())
    }

    async fn query_prefix(
        &self,
        table: &str,
        pk: &str,
        sk_prefix: &str,
        keys_only: bool,
    ) -> Result<Vec<Value>> {
        let tables = self.read_guard()?;
        let data = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let start = (pk.to_string(), sk_prefix.to_string());
        let mut out = Vec::new();
        for ((item_pk, item_sk), item) in data.items.range(start..) {
            if item_pk != pk || !item_sk.starts_with(sk_prefix) {
                break;
            }
            if keys_only {
                let mut projected = Map::new();
                projected.insert(
                    data.schema.partition_attr.clone(),
                    Value::String(item_pk.clone()),
                );
                projected.insert(data.schema.sort_attr.clone(), Value::String(item_sk.clone()));
                out.push(Value::Object(projected));
            } else {
                out.push(item.clone());
            }
        }
        trace!(
            "query_prefix on '{}' for pk '{}' prefix '{}' matched {} item(s)",
            table,
            pk,
            sk_prefix,
            out.len()
        );
        Ok(out)
    }

    async fn update_item(
        &self,
        table: &str,
        key: &ItemKey,
        update: UpdateExpression,
    ) -> Result<Value> {
        let mut tables = self.write_guard()?;
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let doc = data
            .items
            .get_mut(&(key.pk.clone(), key.sk.clone()))
            .ok_or_else(|| StoreError::ConditionFailed(key.sk.clone()))?;
        apply_update(doc, &update)?;
        Ok(doc.clone())
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<()> {
        let mut tables = self.write_guard()?;
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        data.items.remove(&(key.pk.clone(), key.sk.clone()));
        Ok(())
    }

    async fn batch_write(&self, table: &str, requests: Vec<WriteRequest>) -> Result<()> {
        if requests.is_empty() {
            return Err(StoreError::Backend(
                "batch_write requires at least one request".to_string(),
            ));
        }
        if requests.len() > MAX_BATCH_WRITE_ITEMS {
            return Err(StoreError::BatchTooLarge(requests.len()));
        }

        let mut tables = self.write_guard()?;
        let data = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        // Validate puts up front so the batch applies all-or-nothing.
        let mut resolved = Vec::with_capacity(requests.len());
        for request in requests {
            match request {
                WriteRequest::Put { item } => {
                    let key = extract_key(&data.schema, &item)?;
                    resolved.push((key, Some(item)));
                }
                WriteRequest::Delete { key } => {
                    resolved.push(((key.pk, key.sk), None));
                }
            }
        }
        let count = resolved.len();
        for (key, item) in resolved {
            match item {
                Some(item) => {
                    data.items.insert(key, item);
                }
                None => {
                    data.items.remove(&key);
                }
            }
        }
        trace!("batch_write on '{}' applied {} request(s)", table, count);
        Ok(())
    }
}
