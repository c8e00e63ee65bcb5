//! Storage backend abstraction for the dynamic table engine.
//!
//! The engine talks to its backend exclusively through [`StoreClient`], a
//! thin adapter over a schemaless key-value service. The operation set is the
//! lowest common denominator the engine needs: get-by-key, prefix-range
//! query, put, delete, conditional partial-update and bounded batch-write.
//! Concrete adapters (the in-memory reference backend, a remote document
//! store client) implement this trait; the engine never sees past it.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Maximum number of put/delete requests one `batch_write` call accepts.
///
/// Mirrors the backend's hard batch limit; callers chunk at this size.
pub const MAX_BATCH_WRITE_ITEMS: usize = 25;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by a [`StoreClient`] implementation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A conditional update's target item does not exist.
    #[error("conditional check failed for key '{0}'")]
    ConditionFailed(String),

    /// A batch_write call carried more requests than the backend accepts.
    #[error("batch of {0} items exceeds the backend write limit")]
    BatchTooLarge(usize),

    /// The named backend table does not exist.
    #[error("backend table not found: {0}")]
    TableNotFound(String),

    /// An item or key failed to encode/decode.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A key does not match the expected encoding.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Internal lock poisoned (in-process backends only).
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    /// Any other backend failure (I/O, throttling, transport).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Full composite key of one item: partition key + sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub pk: String,
    pub sk: String,
}

impl ItemKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// One request inside a `batch_write` call.
#[derive(Debug, Clone)]
pub enum WriteRequest {
    /// Insert or replace a full item. The item document must carry the
    /// table's key attributes.
    Put { item: Value },

    /// Remove the item at a key. No-op if absent.
    Delete { key: ItemKey },
}

/// A partial update built purely from opaque placeholders.
///
/// `expression` references attribute names only through `#` aliases resolved
/// via `names`, and values only through `:` slots resolved via `values`.
/// Raw user-supplied field names never appear in the expression string, so
/// backend reserved words cannot collide with them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateExpression {
    /// e.g. `SET updated_at = :updated_at, #fields.#f0 = :v0`
    pub expression: String,

    /// Alias → real attribute name, e.g. `#f0` → `Verb`.
    pub names: BTreeMap<String, String>,

    /// Slot → value, e.g. `:v0` → `"worked"`.
    pub values: BTreeMap<String, Value>,
}

/// Backend adapter: a schemaless key-value service holding JSON documents
/// addressed by a partition key and an ordered sort key.
///
/// Implementations must be thread-safe; the client handle is shared across
/// concurrent requests without client-side locking. Every method is an
/// await point and may be long-running.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Insert or replace one item unconditionally. The document must carry
    /// the backend table's key attributes.
    async fn put_item(&self, table: &str, item: Value) -> Result<()>;

    /// Fetch one item by its full key. `Ok(None)` if absent.
    async fn get_item(&self, table: &str, key: &ItemKey) -> Result<Option<Value>>;

    /// Range query: every item whose partition key equals `pk` and whose
    /// sort key begins with `sk_prefix`, in sort-key order. With
    /// `keys_only`, items are projected down to their key attributes.
    async fn query_prefix(
        &self,
        table: &str,
        pk: &str,
        sk_prefix: &str,
        keys_only: bool,
    ) -> Result<Vec<Value>>;

    /// Apply a partial update to an existing item and return its new image.
    ///
    /// Conditioned on existence: a missing item fails with
    /// [`StoreError::ConditionFailed`], never an implicit create.
    async fn update_item(
        &self,
        table: &str,
        key: &ItemKey,
        update: UpdateExpression,
    ) -> Result<Value>;

    /// Delete one item by key. Succeeds even if the key was absent.
    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<()>;

    /// Apply up to [`MAX_BATCH_WRITE_ITEMS`] put/delete requests as one
    /// backend call. The call is atomic as a unit; sequencing of multiple
    /// batches is the caller's concern.
    async fn batch_write(&self, table: &str, requests: Vec<WriteRequest>) -> Result<()>;
}
