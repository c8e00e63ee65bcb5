//! The persisted dynamic-table item.
//!
//! A single entity shape covers both variants stored in the backend: the
//! HEADER item carrying a table's column definitions and the ROW items
//! carrying its data. Both share one key scheme (`owner_key` + `item_key`),
//! which is the only lookup path.

use crate::ids::{RowId, TableName};
use crate::models::column::ColumnDefinition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attribute name of the partition (owner) key in the stored record.
pub const OWNER_KEY_ATTR: &str = "owner_key";

/// Attribute name of the sort (item) key in the stored record.
pub const ITEM_KEY_ATTR: &str = "item_key";

/// Discriminator between the two item variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemKind {
    Header,
    Row,
}

impl ItemKind {
    /// The literal tag embedded in sort keys.
    pub fn tag(&self) -> &'static str {
        match self {
            ItemKind::Header => "HEADER",
            ItemKind::Row => "ROW",
        }
    }
}

/// Kind-specific payload of a [`TableItem`], tagged as `kind` in the stored
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "UPPERCASE")]
pub enum ItemBody {
    /// Schema record: ordered column definitions. At most one per table;
    /// its absence means the table does not exist for reads.
    Header { columns: Vec<ColumnDefinition> },

    /// Data record: immutable identity plus an arbitrary field mapping,
    /// not validated against the header's declared column types.
    Row {
        row_id: RowId,
        fields: Map<String, Value>,
    },
}

impl ItemBody {
    pub fn kind(&self) -> ItemKind {
        match self {
            ItemBody::Header { .. } => ItemKind::Header,
            ItemBody::Row { .. } => ItemKind::Row,
        }
    }
}

/// The sole persisted entity of the dynamic table engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableItem {
    /// Partition key, derived from the tenant id.
    pub owner_key: String,

    /// Sort key, derived from node id + table name + kind (+ row id).
    pub item_key: String,

    /// Name of the dynamic table this item belongs to.
    pub table_name: TableName,

    #[serde(flatten)]
    pub body: ItemBody,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableItem {
    pub fn kind(&self) -> ItemKind {
        self.body.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::column::{ColumnDefinition, ColumnType};
    use serde_json::json;

    fn header_item() -> TableItem {
        let now = Utc::now();
        TableItem {
            owner_key: "userId-u1".to_string(),
            item_key: "n1-TABLE-Inventory-HEADER".to_string(),
            table_name: TableName::new("Inventory").unwrap(),
            body: ItemBody::Header {
                columns: vec![ColumnDefinition::simple("Name", ColumnType::String)],
            },
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_kind_tag_matches_key_suffix() {
        assert_eq!(ItemKind::Header.tag(), "HEADER");
        assert_eq!(ItemKind::Row.tag(), "ROW");
    }

    #[test]
    fn test_item_serializes_flat_with_kind_tag() {
        let value = serde_json::to_value(header_item()).unwrap();
        assert_eq!(value["kind"], "HEADER");
        assert_eq!(value["owner_key"], "userId-u1");
        assert_eq!(value["columns"][0]["name"], "Name");
        // ROW-only attributes are absent on a header
        assert!(value.get("fields").is_none());
        assert!(value.get("row_id").is_none());
    }

    #[test]
    fn test_item_roundtrip() {
        let item = header_item();
        let back: TableItem =
            serde_json::from_value(serde_json::to_value(&item).unwrap()).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_row_item_roundtrip() {
        let now = Utc::now();
        let mut fields = Map::new();
        fields.insert("Name".to_string(), json!("screwdriver"));
        fields.insert("Count".to_string(), json!(4));
        let item = TableItem {
            owner_key: "userId-u1".to_string(),
            item_key: "n1-TABLE-Inventory-ROW-r1".to_string(),
            table_name: TableName::new("Inventory").unwrap(),
            body: ItemBody::Row {
                row_id: RowId::new("r1"),
                fields,
            },
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["kind"], "ROW");
        assert_eq!(value["fields"]["Count"], 4);
        let back: TableItem = serde_json::from_value(value).unwrap();
        assert_eq!(back.kind(), ItemKind::Row);
        assert_eq!(back, item);
    }
}
