//! Column definitions for dynamic table headers.

use serde::{Deserialize, Serialize};

/// Data type a column declares for its values.
///
/// Declarations are advisory: row fields are not validated against them at
/// write time, only presence checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Enum,
    Number,
    Datetime,
    Boolean,
    Array,
    Object,
}

/// Definition of one column in a dynamic table header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Column name, arbitrary user input.
    pub name: String,

    /// Declared value type.
    pub data_type: ColumnType,

    /// Allowed values when `data_type` is [`ColumnType::Enum`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_options: Option<Vec<String>>,

    /// Whether clients may sort by this column.
    #[serde(default)]
    pub sortable: bool,
}

impl ColumnDefinition {
    /// Create a column with minimal configuration.
    pub fn simple(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            enum_options: None,
            sortable: false,
        }
    }

    /// Create a sortable column.
    pub fn sortable(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            enum_options: None,
            sortable: true,
        }
    }

    /// Create an enum column with its allowed options.
    pub fn enumeration(name: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data_type: ColumnType::Enum,
            enum_options: Some(options),
            sortable: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ColumnType::Datetime).unwrap(),
            "\"datetime\""
        );
        assert_eq!(
            serde_json::from_str::<ColumnType>("\"number\"").unwrap(),
            ColumnType::Number
        );
    }

    #[test]
    fn test_column_definition_roundtrip() {
        let col = ColumnDefinition::sortable("Age", ColumnType::Number);
        let json = serde_json::to_string(&col).unwrap();
        let back: ColumnDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, col);
        // enum_options is omitted entirely when absent
        assert!(!json.contains("enum_options"));
    }

    #[test]
    fn test_enum_column_keeps_options() {
        let col = ColumnDefinition::enumeration(
            "Status",
            vec!["open".to_string(), "closed".to_string()],
        );
        let back: ColumnDefinition =
            serde_json::from_str(&serde_json::to_string(&col).unwrap()).unwrap();
        assert_eq!(back.enum_options.unwrap().len(), 2);
    }
}
