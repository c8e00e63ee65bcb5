//! Request payloads accepted by the table engine.
//!
//! Kind-specific parts (`columns` for headers, `fields`/`row_id` for rows)
//! arrive optional from the transport; the engine enforces presence per kind
//! before touching the backend.

use dyntable_commons::{ColumnDefinition, ItemKind, NodeId, RowId, TableName};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Create a single header or row item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItemRequest {
    pub node_id: NodeId,
    pub table_name: TableName,
    pub kind: ItemKind,

    /// Required when `kind` is HEADER.
    #[serde(default)]
    pub columns: Option<Vec<ColumnDefinition>>,

    /// Required when `kind` is ROW.
    #[serde(default)]
    pub fields: Option<Map<String, Value>>,
}

/// Create many rows in one call.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchCreateRequest {
    pub node_id: NodeId,
    pub table_name: TableName,
    pub rows: Vec<Map<String, Value>>,
}

/// Partially update one row's fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRowRequest {
    pub node_id: NodeId,
    pub table_name: TableName,
    pub row_id: RowId,
    pub fields: Map<String, Value>,
}

/// Delete a single header or row item.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteItemRequest {
    pub node_id: NodeId,
    pub table_name: TableName,
    pub kind: ItemKind,

    /// Required when `kind` is ROW.
    #[serde(default)]
    pub row_id: Option<RowId>,
}

/// Delete many rows by id.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchDeleteRequest {
    pub node_id: NodeId,
    pub table_name: TableName,
    pub row_ids: Vec<RowId>,
}
