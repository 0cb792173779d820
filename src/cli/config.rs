//! Configuration file
//!
//! ```json
//! {
//!   "compiler": { "default_limit": 100 },
//!   "log_level": "INFO",
//!   "wal_page_bytes": 4096
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::compiler::CompilerConfig;
use crate::observability::Severity;
use crate::wal::{MIN_SECTOR_BYTES, WAL_PAGE_BYTES};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Compiler settings
    #[serde(default)]
    pub compiler: CompilerConfig,

    /// Minimum log severity (optional, default "INFO")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// WAL flush alignment in bytes (optional, default 4096)
    #[serde(default = "default_wal_page_bytes")]
    pub wal_page_bytes: usize,
}

fn default_log_level() -> String {
    "INFO".to_string()
}
fn default_wal_page_bytes() -> usize {
    WAL_PAGE_BYTES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compiler: CompilerConfig::default(),
            log_level: default_log_level(),
            wal_page_bytes: default_wal_page_bytes(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.compiler.default_limit == 0 {
            return Err(CliError::config_error("compiler.default_limit must be > 0"));
        }

        if Severity::from_name(&self.log_level).is_none() {
            return Err(CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected TRACE, INFO, WARN, ERROR or FATAL.",
                self.log_level
            )));
        }

        if self.wal_page_bytes == 0 || self.wal_page_bytes % MIN_SECTOR_BYTES != 0 {
            return Err(CliError::config_error(format!(
                "wal_page_bytes must be a non-zero multiple of {}",
                MIN_SECTOR_BYTES
            )));
        }

        Ok(())
    }

    /// Minimum log severity; validated at load
    pub fn severity(&self) -> Severity {
        Severity::from_name(&self.log_level).unwrap_or(Severity::Info)
    }
}
