//! Module configuration.
//!
//! # Invariants
//! - Missing fields fall back to defaults, so partial host configs load.

use serde::{Deserialize, Serialize};

/// Startup options for one annotation module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Initial global selection policy.
    pub selection_enabled: bool,
    /// When `false`, predefined items are materialized during `init`
    /// regardless of visibility and no scroll listener is installed.
    pub lazy_load: bool,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            selection_enabled: true,
            lazy_load: true,
        }
    }
}
