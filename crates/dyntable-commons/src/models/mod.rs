//! Data models shared across the dyntable crates.

pub mod column;
pub mod item;
