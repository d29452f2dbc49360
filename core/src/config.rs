//! Synchronization settings.
//!
//! Defines the YAML-serializable configuration shared by sync and extract.
//! Every field is optional; a missing field keeps its default.
//!
//! # Example YAML
//!
//! ```yaml
//! system_table_prefix: "sqlite_"
//! database_schema: main
//! dry_run: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Prefix SQLite reserves for its internal tables.
pub const DEFAULT_SYSTEM_TABLE_PREFIX: &str = "sqlite_";

/// Attached database whose tables are inspected.
pub const DEFAULT_DATABASE_SCHEMA: &str = "main";

/// Settings for a sync or extract run.
///
/// # Examples
///
/// ```
/// use schema_sync_core::SyncConfig;
///
/// let config: SyncConfig = serde_yaml::from_str("dry_run: true").unwrap();
/// assert!(config.dry_run);
/// assert_eq!(config.system_table_prefix, "sqlite_");
/// assert!(config.is_system_table("sqlite_sequence"));
/// assert!(!config.is_system_table("users"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tables whose names start with this prefix are never listed.
    pub system_table_prefix: String,
    /// Attached database to inspect and modify.
    pub database_schema: String,
    /// Plan and log statements without executing them.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            system_table_prefix: DEFAULT_SYSTEM_TABLE_PREFIX.to_string(),
            database_schema: DEFAULT_DATABASE_SCHEMA.to_string(),
            dry_run: false,
        }
    }
}

impl SyncConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::SchemaError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::SchemaError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Returns `true` if `table` carries the engine-reserved prefix.
    pub fn is_system_table(&self, table: &str) -> bool {
        !self.system_table_prefix.is_empty() && table.starts_with(&self.system_table_prefix)
    }
}
