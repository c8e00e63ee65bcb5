//! # dyntable-engine
//!
//! The dynamic table engine: lets each tenant attach runtime-defined tables
//! (column sets + rows, no fixed schema) to nodes of their document
//! hierarchy, projected onto a schemaless key-value backend through the
//! `dyntable-store` boundary.
//!
//! The engine is stateless beyond its injected store handle and
//! configuration; one [`TableEngine`] value is shared across concurrent
//! requests. Within a single operation, backend calls are strictly
//! sequential, since batch chunks and query-then-delete have a required order.
//! Writes to the same key race last-writer-wins; there is no version token.

pub mod config;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod requests;
pub mod results;
pub mod update_expr;

pub use config::EngineConfig;
pub use engine::TableEngine;
pub use error::{EngineError, Result};
pub use requests::{
    BatchCreateRequest, BatchDeleteRequest, DeleteItemRequest, NewItemRequest, UpdateRowRequest,
};
pub use results::{BatchErrorDetail, BatchSummary, RowView, TableDeleted, TableDetail};
