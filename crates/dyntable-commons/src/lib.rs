//! # dyntable-commons
//!
//! Shared types for the dyntable workspace: typed identifier wrappers,
//! the dynamic-table schema model, the persisted item model and the uniform
//! response envelope. This crate has no storage dependency, allowing both the
//! store boundary and the table engine to build on the same vocabulary.

pub mod errors;
pub mod ids;
pub mod models;
pub mod response;

pub use errors::{CommonError, Result};
pub use ids::{NodeId, RowId, TableName, UserId, TABLE_DELIMITER};
pub use models::column::{ColumnDefinition, ColumnType};
pub use models::item::{ItemBody, ItemKind, TableItem, ITEM_KEY_ATTR, OWNER_KEY_ATTR};
pub use response::ApiResponse;
