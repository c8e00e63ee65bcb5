//! The table engine: orchestrates key encoding, the item model and the store
//! client into the seven dynamic-table operations.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::requests::{
    BatchCreateRequest, BatchDeleteRequest, DeleteItemRequest, NewItemRequest, UpdateRowRequest,
};
use crate::results::{BatchErrorDetail, BatchSummary, RowView, TableDeleted, TableDetail};
use crate::update_expr;
use chrono::Utc;
use dyntable_commons::{
    ItemBody, ItemKind, NodeId, RowId, TableItem, TableName, UserId, ITEM_KEY_ATTR, OWNER_KEY_ATTR,
};
use dyntable_store::key_encoding::{header_key, owner_key, row_key, table_prefix};
use dyntable_store::{ItemKey, StoreClient, StoreError, WriteRequest, MAX_BATCH_WRITE_ITEMS};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

/// Stateless dynamic-table engine over an injected store client.
///
/// Holds only immutable configuration and the shared backend handle; clone or
/// wrap it in `Arc` freely across tasks. Concurrent writers to the same item
/// key race last-writer-wins; there is no optimistic-concurrency token.
pub struct TableEngine {
    store: Arc<dyn StoreClient>,
    config: EngineConfig,
}

impl TableEngine {
    pub fn new(store: Arc<dyn StoreClient>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Create one header or row item.
    ///
    /// Fails with a validation error when the kind-specific payload is
    /// missing, before any backend call. The put is unconditional: an item
    /// already at the derived key is replaced, so re-creating a header
    /// silently swaps the table's schema.
    pub async fn create_item(&self, user: &UserId, request: NewItemRequest) -> Result<TableItem> {
        let NewItemRequest {
            node_id,
            table_name,
            kind,
            columns,
            fields,
        } = request;

        let (item_key, body) = match kind {
            ItemKind::Header => {
                let columns = columns.ok_or_else(|| {
                    EngineError::validation("Columns are required for a HEADER item")
                })?;
                (header_key(&node_id, &table_name), ItemBody::Header { columns })
            }
            ItemKind::Row => {
                let fields = fields.ok_or_else(|| {
                    EngineError::validation("Fields are required for a ROW item")
                })?;
                let row_id = RowId::generate();
                (
                    row_key(&node_id, &table_name, &row_id),
                    ItemBody::Row { row_id, fields },
                )
            }
        };

        let now = Utc::now();
        let item = TableItem {
            owner_key: owner_key(user),
            item_key,
            table_name,
            body,
            created_at: now,
            updated_at: now,
        };

        self.store
            .put_item(&self.config.backend_table, to_document(&item)?)
            .await?;
        debug!("created {:?} item at '{}'", item.kind(), item.item_key);
        Ok(item)
    }

    /// Create many rows, chunked at the backend batch limit.
    ///
    /// Chunks are issued sequentially; a failed chunk is recorded in the
    /// summary and the remaining chunks continue. Successful chunks are never
    /// rolled back.
    pub async fn batch_create_rows(
        &self,
        user: &UserId,
        request: BatchCreateRequest,
    ) -> Result<BatchSummary> {
        let BatchCreateRequest {
            node_id,
            table_name,
            rows,
        } = request;

        if rows.is_empty() {
            return Err(EngineError::validation("At least one row is required"));
        }

        let total_requested = rows.len();
        let now = Utc::now();
        let pk = owner_key(user);
        let mut requests = Vec::with_capacity(rows.len());
        for fields in rows {
            let row_id = RowId::generate();
            let item = TableItem {
                owner_key: pk.clone(),
                item_key: row_key(&node_id, &table_name, &row_id),
                table_name: table_name.clone(),
                body: ItemBody::Row { row_id, fields },
                created_at: now,
                updated_at: now,
            };
            requests.push(WriteRequest::Put {
                item: to_document(&item)?,
            });
        }

        let mut summary = self.run_chunked(requests).await;
        summary.total_requested = total_requested;
        debug!(
            "batch create for table '{}': {}/{} rows written",
            table_name, summary.total_processed, total_requested
        );
        Ok(summary)
    }

    /// Read one table in full: header columns plus every row.
    ///
    /// A single prefix query serves the whole read; an empty result means the
    /// table does not exist for this tenant and node.
    pub async fn read_table_detail(
        &self,
        user: &UserId,
        node_id: &NodeId,
        table_name: &TableName,
    ) -> Result<TableDetail> {
        let items = self
            .store
            .query_prefix(
                &self.config.backend_table,
                &owner_key(user),
                &table_prefix(node_id, table_name),
                false,
            )
            .await?;

        if items.is_empty() {
            return Err(EngineError::not_found(format!(
                "Table not found for nodeId: {node_id} and table: {table_name}"
            )));
        }

        let mut columns = Vec::new();
        let mut rows = Vec::new();
        for item in items {
            let item: TableItem = serde_json::from_value(item)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            match item.body {
                ItemBody::Header { columns: cols } => columns = cols,
                ItemBody::Row { row_id, fields } => rows.push(RowView { row_id, fields }),
            }
        }

        debug!(
            "table detail for '{}': {} columns, {} rows",
            table_name,
            columns.len(),
            rows.len()
        );
        Ok(TableDetail {
            table_name: table_name.clone(),
            columns,
            rows,
        })
    }

    /// Partially update one row's fields and return the row's new fields.
    ///
    /// The update is conditioned on the row existing; a missing row surfaces
    /// as NotFound and is never created implicitly.
    pub async fn update_row(
        &self,
        user: &UserId,
        request: UpdateRowRequest,
    ) -> Result<Map<String, Value>> {
        let UpdateRowRequest {
            node_id,
            table_name,
            row_id,
            fields,
        } = request;

        if fields.is_empty() {
            return Err(EngineError::validation("At least one field is required"));
        }

        let key = ItemKey::new(owner_key(user), row_key(&node_id, &table_name, &row_id));
        let update = update_expr::build_row_update(&fields, Utc::now());

        let new_image = match self
            .store
            .update_item(&self.config.backend_table, &key, update)
            .await
        {
            Ok(image) => image,
            Err(StoreError::ConditionFailed(_)) => {
                return Err(EngineError::not_found(format!(
                    "Row {row_id} not found in table {table_name}"
                )))
            }
            Err(e) => return Err(e.into()),
        };

        debug!("updated row '{}' in table '{}'", row_id, table_name);
        new_image
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| {
                EngineError::Store(StoreError::Serialization(
                    "updated item has no fields object".to_string(),
                ))
            })
    }

    /// Delete a single item. Idempotent: deleting an absent key succeeds.
    pub async fn delete_item(&self, user: &UserId, request: DeleteItemRequest) -> Result<()> {
        let DeleteItemRequest {
            node_id,
            table_name,
            kind,
            row_id,
        } = request;

        let sk = match kind {
            ItemKind::Header => header_key(&node_id, &table_name),
            ItemKind::Row => {
                let row_id = row_id.ok_or_else(|| {
                    EngineError::validation("RowId is required for a ROW item")
                })?;
                row_key(&node_id, &table_name, &row_id)
            }
        };

        self.store
            .delete_item(
                &self.config.backend_table,
                &ItemKey::new(owner_key(user), sk),
            )
            .await?;
        debug!("deleted {kind:?} item from table '{table_name}'");
        Ok(())
    }

    /// Delete many rows by id, chunked at the backend batch limit.
    ///
    /// Duplicate ids collapse to one delete each and are reported, not
    /// rejected. Failed chunks are recorded while the rest continue; nothing
    /// is rolled back.
    pub async fn batch_delete_rows(
        &self,
        user: &UserId,
        request: BatchDeleteRequest,
    ) -> Result<BatchSummary> {
        let BatchDeleteRequest {
            node_id,
            table_name,
            row_ids,
        } = request;

        if row_ids.is_empty() {
            return Err(EngineError::validation("At least one row id is required"));
        }

        let total_requested = row_ids.len();
        let mut seen = HashSet::with_capacity(row_ids.len());
        let mut deduped = Vec::with_capacity(row_ids.len());
        for row_id in row_ids {
            if seen.insert(row_id.clone()) {
                deduped.push(row_id);
            }
        }
        let duplicates_removed = total_requested - deduped.len();
        if duplicates_removed > 0 {
            warn!(
                "batch delete for table '{}': {} duplicate row id(s) collapsed",
                table_name, duplicates_removed
            );
        }

        let pk = owner_key(user);
        let requests = deduped
            .iter()
            .map(|row_id| WriteRequest::Delete {
                key: ItemKey::new(pk.clone(), row_key(&node_id, &table_name, row_id)),
            })
            .collect();

        let mut summary = self.run_chunked(requests).await;
        summary.total_requested = total_requested;
        summary.duplicates_removed = duplicates_removed;
        debug!(
            "batch delete for table '{}': {}/{} rows deleted",
            table_name,
            summary.total_processed,
            deduped.len()
        );
        Ok(summary)
    }

    /// Delete an entire table: header and all rows under its key prefix.
    ///
    /// Reads the matching keys first, then deletes them in sequential
    /// batches. A failed batch aborts the remainder; already-deleted chunks
    /// are not restored, leaving the table partially deleted.
    pub async fn delete_table(
        &self,
        user: &UserId,
        node_id: &NodeId,
        table_name: &TableName,
    ) -> Result<TableDeleted> {
        let pk = owner_key(user);
        let key_items = self
            .store
            .query_prefix(
                &self.config.backend_table,
                &pk,
                &table_prefix(node_id, table_name),
                true,
            )
            .await?;

        if key_items.is_empty() {
            return Err(EngineError::not_found(format!(
                "Table {table_name} not found"
            )));
        }

        let mut requests = Vec::with_capacity(key_items.len());
        for key_item in &key_items {
            requests.push(WriteRequest::Delete {
                key: projected_key(key_item)?,
            });
        }

        let deleted_count = requests.len();
        for (index, chunk) in requests.chunks(MAX_BATCH_WRITE_ITEMS).enumerate() {
            if let Err(e) = self
                .store
                .batch_write(&self.config.backend_table, chunk.to_vec())
                .await
            {
                warn!(
                    "table delete for '{}' aborted at chunk {}: {}",
                    table_name, index, e
                );
                return Err(e.into());
            }
        }

        debug!("deleted table '{}' ({} items)", table_name, deleted_count);
        Ok(TableDeleted { deleted_count })
    }

    /// Issue `requests` in sequential chunks of at most the backend batch
    /// limit, catching failures per chunk.
    async fn run_chunked(&self, requests: Vec<WriteRequest>) -> BatchSummary {
        let mut summary = BatchSummary {
            total_requested: requests.len(),
            total_processed: 0,
            total_errors: 0,
            errors: Vec::new(),
            duplicates_removed: 0,
        };

        for (index, chunk) in requests.chunks(MAX_BATCH_WRITE_ITEMS).enumerate() {
            match self
                .store
                .batch_write(&self.config.backend_table, chunk.to_vec())
                .await
            {
                Ok(()) => summary.total_processed += chunk.len(),
                Err(e) => {
                    warn!("batch chunk {} failed: {}", index, e);
                    summary.total_errors += chunk.len();
                    summary.errors.push(BatchErrorDetail {
                        chunk_index: index,
                        item_count: chunk.len(),
                        error: e.to_string(),
                    });
                }
            }
        }
        summary
    }
}

fn to_document(item: &TableItem) -> Result<Value> {
    serde_json::to_value(item)
        .map_err(|e| EngineError::Store(StoreError::Serialization(e.to_string())))
}

/// Recover the full key from a keys-only query projection.
fn projected_key(key_item: &Value) -> Result<ItemKey> {
    let pk = key_item.get(OWNER_KEY_ATTR).and_then(Value::as_str);
    let sk = key_item.get(ITEM_KEY_ATTR).and_then(Value::as_str);
    match (pk, sk) {
        (Some(pk), Some(sk)) => Ok(ItemKey::new(pk, sk)),
        _ => Err(EngineError::Store(StoreError::Serialization(
            "keys-only projection is missing key attributes".to_string(),
        ))),
    }
}
