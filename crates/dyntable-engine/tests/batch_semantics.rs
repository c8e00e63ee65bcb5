//! Chunking, de-duplication and partial-failure accounting of the batch
//! operations, including the abort behavior of full-table deletes.

use dyntable_commons::{NodeId, RowId, TableName, UserId};
use dyntable_engine::{
    BatchCreateRequest, BatchDeleteRequest, EngineConfig, EngineError, TableEngine,
};
use dyntable_store::test_utils::RecordingStore;
use dyntable_store::{InMemoryStore, StoreClient};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::Arc;

const BACKEND_TABLE: &str = "dynamic_tables";

fn engine() -> (TableEngine, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::new(
        InMemoryStore::new().with_table(BACKEND_TABLE, "owner_key", "item_key"),
    ));
    let engine = TableEngine::new(
        store.clone() as Arc<dyn StoreClient>,
        EngineConfig::default(),
    );
    (engine, store)
}

fn user() -> UserId {
    UserId::new("U1")
}

fn node() -> NodeId {
    NodeId::new("N1").unwrap()
}

fn table() -> TableName {
    TableName::new("Inventory").unwrap()
}

fn rows(count: usize) -> Vec<Map<String, Value>> {
    (0..count)
        .map(|i| {
            let mut fields = Map::new();
            fields.insert("index".to_string(), json!(i));
            fields
        })
        .collect()
}

async fn seed_rows(engine: &TableEngine, count: usize) -> Vec<RowId> {
    let summary = engine
        .batch_create_rows(
            &user(),
            BatchCreateRequest {
                node_id: node(),
                table_name: table(),
                rows: rows(count),
            },
        )
        .await
        .unwrap();
    assert!(summary.success());

    let detail = engine
        .read_table_detail(&user(), &node(), &table())
        .await
        .unwrap();
    detail.rows.into_iter().map(|r| r.row_id).collect()
}

#[tokio::test]
async fn batch_create_assigns_distinct_row_ids() {
    let (engine, _) = engine();
    let ids = seed_rows(&engine, 5).await;
    let unique: HashSet<RowId> = ids.iter().cloned().collect();
    assert_eq!(unique.len(), 5);
}

#[tokio::test]
async fn batch_create_rejects_empty_row_list() {
    let (engine, store) = engine();
    let err = engine
        .batch_create_rows(
            &user(),
            BatchCreateRequest {
                node_id: node(),
                table_name: table(),
                rows: Vec::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn batch_delete_rejects_empty_id_list() {
    let (engine, store) = engine();
    let err = engine
        .batch_delete_rows(
            &user(),
            BatchDeleteRequest {
                node_id: node(),
                table_name: table(),
                row_ids: Vec::new(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn batch_delete_collapses_duplicate_ids() {
    let (engine, _) = engine();
    let ids = seed_rows(&engine, 3).await;

    let summary = engine
        .batch_delete_rows(
            &user(),
            BatchDeleteRequest {
                node_id: node(),
                table_name: table(),
                row_ids: vec![ids[0].clone(), ids[1].clone(), ids[0].clone()],
            },
        )
        .await
        .unwrap();
    assert!(summary.success());
    assert_eq!(summary.total_requested, 3);
    assert_eq!(summary.duplicates_removed, 1);
    assert_eq!(summary.total_processed, 2);

    let detail = engine
        .read_table_detail(&user(), &node(), &table())
        .await
        .unwrap();
    assert_eq!(detail.rows.len(), 1);
    assert_eq!(detail.rows[0].row_id, ids[2]);
}

#[tokio::test]
async fn delete_table_with_thirty_items_issues_two_chunks() {
    let (engine, store) = engine();
    seed_rows(&engine, 30).await; // creates use batches 0 and 1

    let deleted = engine
        .delete_table(&user(), &node(), &table())
        .await
        .unwrap();
    assert_eq!(deleted.deleted_count, 30);
    assert_eq!(store.batch_sizes(), vec![25, 5, 25, 5]);
    assert_eq!(store.inner().item_count(BACKEND_TABLE).unwrap(), 0);
}

#[tokio::test]
async fn batch_create_records_failed_chunk_and_continues() {
    let (engine, store) = engine();
    store.fail_batch(0);

    let summary = engine
        .batch_create_rows(
            &user(),
            BatchCreateRequest {
                node_id: node(),
                table_name: table(),
                rows: rows(26),
            },
        )
        .await
        .unwrap();
    assert!(!summary.success());
    assert_eq!(summary.total_requested, 26);
    assert_eq!(summary.total_processed, 1);
    assert_eq!(summary.total_errors, 25);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].chunk_index, 0);
    assert_eq!(summary.errors[0].item_count, 25);

    // The second chunk was still attempted and applied.
    assert_eq!(store.batch_sizes(), vec![25, 1]);
    assert_eq!(store.inner().item_count(BACKEND_TABLE).unwrap(), 1);
}

#[tokio::test]
async fn batch_delete_records_failed_chunk_and_continues() {
    let (engine, store) = engine();
    let ids = seed_rows(&engine, 30).await; // batches 0 and 1
    store.fail_batch(2); // first delete chunk

    let summary = engine
        .batch_delete_rows(
            &user(),
            BatchDeleteRequest {
                node_id: node(),
                table_name: table(),
                row_ids: ids,
            },
        )
        .await
        .unwrap();
    assert!(!summary.success());
    assert_eq!(summary.total_processed, 5);
    assert_eq!(summary.total_errors, 25);
    assert_eq!(summary.errors[0].chunk_index, 0);

    // Failed chunk's rows survive; the successful chunk is not rolled back.
    assert_eq!(store.inner().item_count(BACKEND_TABLE).unwrap(), 25);
}

#[tokio::test]
async fn delete_table_aborts_on_first_failed_chunk() {
    let (engine, store) = engine();
    seed_rows(&engine, 30).await; // batches 0 and 1
    store.fail_batch(2); // first delete chunk

    let err = engine
        .delete_table(&user(), &node(), &table())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));

    // The second delete chunk was never attempted.
    assert_eq!(store.batch_sizes(), vec![25, 5, 25]);
    assert_eq!(store.inner().item_count(BACKEND_TABLE).unwrap(), 30);
}

#[tokio::test]
async fn delete_table_on_missing_table_is_not_found() {
    let (engine, _) = engine();
    let err = engine
        .delete_table(&user(), &node(), &table())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn batch_create_preserves_field_payloads() {
    let (engine, _) = engine();
    seed_rows(&engine, 2).await;

    let detail = engine
        .read_table_detail(&user(), &node(), &table())
        .await
        .unwrap();
    let mut indexes: Vec<i64> = detail
        .rows
        .iter()
        .map(|r| r.fields["index"].as_i64().unwrap())
        .collect();
    indexes.sort_unstable();
    assert_eq!(indexes, vec![0, 1]);
}

#[tokio::test]
async fn batch_rows_land_under_the_table_prefix() {
    let (engine, _) = engine();
    seed_rows(&engine, 1).await;

    // A different table under the same node must stay invisible.
    let other = TableName::new("Shopping").unwrap();
    let err = engine
        .read_table_detail(&user(), &node(), &other)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let detail = engine
        .read_table_detail(&user(), &node(), &table())
        .await
        .unwrap();
    assert!(!detail.rows[0].fields.is_empty());
}
