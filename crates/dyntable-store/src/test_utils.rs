//! Test utilities for crates building on the store boundary.
//!
//! [`RecordingStore`] wraps the in-memory backend, records how the caller
//! drives it (call counts, query arguments, batch sizes) and can fail
//! selected batch calls to exercise partial-failure accounting.

use crate::memory::InMemoryStore;
use crate::storage_trait::{
    ItemKey, Result, StoreClient, StoreError, UpdateExpression, WriteRequest,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Arguments of the most recent prefix query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryArgs {
    pub pk: String,
    pub sk_prefix: String,
    pub keys_only: bool,
}

/// StoreClient wrapper that records backend traffic.
pub struct RecordingStore {
    inner: InMemoryStore,
    puts: AtomicUsize,
    gets: AtomicUsize,
    queries: AtomicUsize,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    last_query: Mutex<Option<QueryArgs>>,
    batch_attempts: Mutex<Vec<usize>>,
    fail_batches: Mutex<HashSet<usize>>,
}

impl RecordingStore {
    pub fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            puts: AtomicUsize::new(0),
            gets: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            batch_attempts: Mutex::new(Vec::new()),
            fail_batches: Mutex::new(HashSet::new()),
        }
    }

    /// Make the `index`-th batch_write call (0-based) fail.
    pub fn fail_batch(&self, index: usize) {
        self.fail_batches.lock().unwrap().insert(index);
    }

    /// Total backend calls issued so far, across all operations.
    pub fn total_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
            + self.gets.load(Ordering::SeqCst)
            + self.queries.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
            + self.batch_attempts.lock().unwrap().len()
    }

    /// Sizes of every attempted batch_write call, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_attempts.lock().unwrap().clone()
    }

    pub fn query_calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<QueryArgs> {
        self.last_query.lock().unwrap().clone()
    }

    /// Direct access to the wrapped backend, e.g. for seeding.
    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }
}

#[async_trait]
impl StoreClient for RecordingStore {
    async fn put_item(&self, table: &str, item: Value) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_item(table, item).await
    }

    async fn get_item(&self, table: &str, key: &ItemKey) -> Result<Option<Value>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(table, key).await
    }

    async fn query_prefix(
        &self,
        table: &str,
        pk: &str,
        sk_prefix: &str,
        keys_only: bool,
    ) -> Result<Vec<Value>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(QueryArgs {
            pk: pk.to_string(),
            sk_prefix: sk_prefix.to_string(),
            keys_only,
        });
        self.inner.query_prefix(table, pk, sk_prefix, keys_only).await
    }

    async fn update_item(
        &self,
        table: &str,
        key: &ItemKey,
        update: UpdateExpression,
    ) -> Result<Value> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_item(table, key, update).await
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_item(table, key).await
    }

    async fn batch_write(&self, table: &str, requests: Vec<WriteRequest>) -> Result<()> {
        let index = {
            let mut attempts = self.batch_attempts.lock().unwrap();
            attempts.push(requests.len());
            attempts.len() - 1
        };
        if self.fail_batches.lock().unwrap().contains(&index) {
            return Err(StoreError::Backend(format!(
                "injected failure for batch call {index}"
            )));
        }
        self.inner.batch_write(table, requests).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_calls_and_injects_batch_failure() {
        let store = RecordingStore::new(
            InMemoryStore::new().with_table("t", "owner_key", "item_key"),
        );
        store.fail_batch(0);

        let err = store
            .batch_write(
                "t",
                vec![WriteRequest::Put {
                    item: json!({ "owner_key": "p", "item_key": "s" }),
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(store.batch_sizes(), vec![1]);
        // The injected failure must not have applied the batch.
        assert_eq!(store.inner().item_count("t").unwrap(), 0);

        store
            .query_prefix("t", "p", "s", true)
            .await
            .unwrap();
        assert_eq!(
            store.last_query().unwrap(),
            QueryArgs {
                pk: "p".to_string(),
                sk_prefix: "s".to_string(),
                keys_only: true,
            }
        );
        assert_eq!(store.total_calls(), 2);
    }
}
