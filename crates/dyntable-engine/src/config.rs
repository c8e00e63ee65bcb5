//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Immutable configuration handed to the engine at construction.
///
/// The store client handle is injected separately; nothing here is mutable
/// process state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name of the backend table all dynamic-table items live in.
    #[serde(default = "default_backend_table")]
    pub backend_table: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_table: default_backend_table(),
        }
    }
}

fn default_backend_table() -> String {
    "dynamic_tables".to_string()
}
