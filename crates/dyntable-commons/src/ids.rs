//! Type-safe wrappers for tenant, node, table and row identifiers.
//!
//! Dynamic table items live in one flat keyspace, so a table name used where
//! a node id is expected silently corrupts keys. Newtype wrappers make that a
//! compile error, and validated constructors keep the key-encoding delimiter
//! out of segments that end up inside sort keys.

use crate::errors::{CommonError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Delimiter separating the node segment from the table segment in sort keys.
///
/// Node ids and table names must never contain this sequence, or the
/// prefix-scan contract of the keyspace breaks.
pub const TABLE_DELIMITER: &str = "-TABLE-";

/// Tenant identity issued by the auth layer. Opaque, trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Document node identity issued by the hierarchy service.
///
/// Opaque except for one constraint: it participates in sort keys, so it must
/// be non-empty and free of the `-TABLE-` delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        validate_key_segment("node id", &id)?;
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NodeId {
    type Error = CommonError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Name of one dynamic table under a node.
///
/// Non-empty and free of the `-TABLE-` delimiter, same reasoning as [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName(String);

impl TableName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_key_segment("table name", &name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TableName {
    type Error = CommonError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.0
    }
}

/// Row identity, generated once at row creation and never mutated or reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh UUIDv4 row id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn validate_key_segment(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CommonError::invalid_input(format!("{what} cannot be empty")));
    }
    if value.contains(TABLE_DELIMITER) {
        return Err(CommonError::invalid_input(format!(
            "{what} cannot contain the reserved sequence '{TABLE_DELIMITER}'"
        )));
    }
    Ok(())
}
