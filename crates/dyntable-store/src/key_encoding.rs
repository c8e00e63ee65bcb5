//! Key encoding for dynamic table items.
//!
//! Every item of the engine lives under a composite key: a partition key
//! derived from the tenant and a sort key multiplexing node, table, item kind
//! and row identity. The formats are load-bearing: range reads and cascading
//! deletes rely on the literal prefixes, so they are centralized here and
//! must not drift:
//!
//! - owner key:  `userId-{user_id}`
//! - header key: `{node_id}-TABLE-{table_name}-HEADER`
//! - row key:    `{node_id}-TABLE-{table_name}-ROW-{row_id}`

use crate::storage_trait::StoreError;
use dyntable_commons::{ItemKind, NodeId, RowId, TableName, UserId};

/// Encode the partition key for one tenant: `userId-{user_id}`
///
/// # Examples
///
/// ```
/// use dyntable_store::key_encoding::owner_key;
/// use dyntable_commons::UserId;
///
/// let key = owner_key(&UserId::new("u1"));
/// assert_eq!(key, "userId-u1");
/// ```
pub fn owner_key(user_id: &UserId) -> String {
    let raw = user_id.as_str();
    let mut s = String::with_capacity(7 + raw.len());
    s.push_str("userId-");
    s.push_str(raw);
    s
}

/// Encode the sort key of a table's header item:
/// `{node_id}-TABLE-{table_name}-HEADER`
///
/// # Examples
///
/// ```
/// use dyntable_store::key_encoding::header_key;
/// use dyntable_commons::{NodeId, TableName};
///
/// let node = NodeId::new("n1").unwrap();
/// let table = TableName::new("Inventory").unwrap();
/// assert_eq!(header_key(&node, &table), "n1-TABLE-Inventory-HEADER");
/// ```
pub fn header_key(node_id: &NodeId, table_name: &TableName) -> String {
    format!(
        "{}-{}",
        table_prefix(node_id, table_name),
        ItemKind::Header.tag()
    )
}

/// Encode the sort key of one row item:
/// `{node_id}-TABLE-{table_name}-ROW-{row_id}`
///
/// # Examples
///
/// ```
/// use dyntable_store::key_encoding::row_key;
/// use dyntable_commons::{NodeId, RowId, TableName};
///
/// let node = NodeId::new("n1").unwrap();
/// let table = TableName::new("Inventory").unwrap();
/// let key = row_key(&node, &table, &RowId::new("r9"));
/// assert_eq!(key, "n1-TABLE-Inventory-ROW-r9");
/// ```
pub fn row_key(node_id: &NodeId, table_name: &TableName, row_id: &RowId) -> String {
    format!(
        "{}-{}-{}",
        table_prefix(node_id, table_name),
        ItemKind::Row.tag(),
        row_id
    )
}

/// The literal sort-key prefix shared by every item of one table:
/// `{node_id}-TABLE-{table_name}`
///
/// Range-scanning this prefix returns the header (if any) and all rows.
pub fn table_prefix(node_id: &NodeId, table_name: &TableName) -> String {
    format!(
        "{}{}{}",
        node_id.as_str(),
        dyntable_commons::TABLE_DELIMITER,
        table_name.as_str()
    )
}

/// The sort-key prefix shared by every table item of one node:
/// `{node_id}-TABLE-`
pub fn node_prefix(node_id: &NodeId) -> String {
    format!("{}{}", node_id.as_str(), dyntable_commons::TABLE_DELIMITER)
}

/// Recover kind and row id from a sort key, given the node and table it was
/// scanned under.
///
/// Sort keys are not globally parseable (node ids and table names may contain
/// dashes), but under a known table prefix the remainder is unambiguous.
pub fn parse_kind_and_row(
    item_key: &str,
    node_id: &NodeId,
    table_name: &TableName,
) -> Result<(ItemKind, Option<RowId>), StoreError> {
    let prefix = table_prefix(node_id, table_name);
    let suffix = item_key
        .strip_prefix(&prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .ok_or_else(|| {
            StoreError::InvalidKey(format!(
                "sort key '{item_key}' does not match table prefix '{prefix}'"
            ))
        })?;

    if suffix == ItemKind::Header.tag() {
        return Ok((ItemKind::Header, None));
    }
    if let Some(row_id) = suffix.strip_prefix("ROW-") {
        if !row_id.is_empty() {
            return Ok((ItemKind::Row, Some(RowId::new(row_id))));
        }
    }
    Err(StoreError::InvalidKey(format!(
        "unrecognized sort key suffix in '{item_key}'"
    )))
}
