//! Compiler configuration

use serde::{Deserialize, Serialize};

/// Limit applied to a select that orders by a range predicate but has no
/// explicit LIMIT
pub const DEFAULT_LIMIT: usize = 100;

/// Settings threaded into every compile call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Limit used when a select has no LIMIT clause (default 100)
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
        }
    }
}
