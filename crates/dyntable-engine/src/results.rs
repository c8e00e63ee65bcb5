//! Typed results returned by engine operations.

use dyntable_commons::{ColumnDefinition, RowId, TableName};
use serde::Serialize;
use serde_json::{Map, Value};

/// Full detail of one dynamic table: its schema and every row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDetail {
    pub table_name: TableName,

    /// Columns from the header item; empty when the table has data but no
    /// header was ever created.
    pub columns: Vec<ColumnDefinition>,

    pub rows: Vec<RowView>,
}

/// The outward projection of one row item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub row_id: RowId,
    pub fields: Map<String, Value>,
}

/// Outcome of a cascading table delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableDeleted {
    pub deleted_count: usize,
}

/// One failed chunk inside a batch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchErrorDetail {
    /// 0-based index of the chunk in submission order.
    pub chunk_index: usize,

    /// Number of items the failed chunk carried.
    pub item_count: usize,

    /// Failure description from the store boundary.
    pub error: String,
}

/// Accounting for a chunked batch operation.
///
/// Chunks that failed are enumerated in `errors`; chunks that succeeded are
/// never rolled back. `total_processed` counts items in successful chunks
/// only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Items in the caller's request, before de-duplication.
    pub total_requested: usize,

    /// Items written/deleted by chunks that succeeded.
    pub total_processed: usize,

    /// Items lost to failed chunks.
    pub total_errors: usize,

    pub errors: Vec<BatchErrorDetail>,

    /// Duplicate ids collapsed before dispatch (delete batches only).
    pub duplicates_removed: usize,
}

impl BatchSummary {
    /// True when every chunk was applied.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}
