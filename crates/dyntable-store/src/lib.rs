//! # dyntable-store
//!
//! The key-value boundary of the dyntable workspace. This crate isolates
//! everything that knows about the backing store so the table engine stays
//! free of backend specifics:
//!
//! ```text
//! dyntable-engine (table logic)
//!     ↓
//! dyntable-store  (key encoding + StoreClient boundary)
//!     ↓
//! backing key-value service (or InMemoryStore)
//! ```
//!
//! The backend model is deliberately narrow: key lookups, ordered prefix
//! scans on the sort key, single-item put/delete/partial-update, and bulk
//! writes capped at [`MAX_BATCH_WRITE_ITEMS`] items per call. Anything richer
//! is the engine's job to compose out of these primitives.

pub mod key_encoding;
pub mod memory;
pub mod storage_trait;
pub mod test_utils;

pub use memory::{InMemoryStore, KeySchema};
pub use storage_trait::{
    ItemKey, Result, StoreClient, StoreError, UpdateExpression, WriteRequest,
    MAX_BATCH_WRITE_ITEMS,
};
