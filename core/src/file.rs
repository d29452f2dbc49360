//! Reading and writing schema descriptor files.
//!
//! A schema file is a JSON (or YAML) document whose top level maps table
//! names to column lists:
//!
//! ```json
//! {
//!   "users": [
//!     { "cid": 0, "name": "id", "type": "INTEGER", "notnull": 0, "dflt_value": null, "pk": 1 },
//!     { "cid": 1, "name": "email", "type": "TEXT", "notnull": 1, "dflt_value": null, "pk": 0 }
//!   ]
//! }
//! ```
//!
//! The format is picked from the file extension: `.yaml` and `.yml` are read
//! as YAML, everything else as JSON.

use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::Schema;

/// Serialization format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaFormat {
    /// Pretty-printed JSON (the default).
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl SchemaFormat {
    /// Picks the format from a file extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use schema_sync_core::SchemaFormat;
    ///
    /// assert_eq!(SchemaFormat::from_path("schema.yml"), SchemaFormat::Yaml);
    /// assert_eq!(SchemaFormat::from_path("schema.json"), SchemaFormat::Json);
    /// assert_eq!(SchemaFormat::from_path("schema"), SchemaFormat::Json);
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

impl Schema {
    /// Loads a schema file, choosing the parser from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Io`](crate::SchemaError::Io) if the file cannot
    /// be read, or a [`Json`](crate::SchemaError::Json) /
    /// [`Yaml`](crate::SchemaError::Yaml) error if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let schema = match SchemaFormat::from_path(path) {
            SchemaFormat::Json => serde_json::from_reader(reader)?,
            SchemaFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        Ok(schema)
    }

    /// Writes the schema to `path` in the format implied by its extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        writer.write_all(self.render(SchemaFormat::from_path(path))?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Parses a JSON schema document.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parses a YAML schema document.
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Renders the schema as two-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Renders the schema as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Renders the schema in the given format.
    pub fn render(&self, format: SchemaFormat) -> Result<String> {
        match format {
            SchemaFormat::Json => self.to_json_pretty(),
            SchemaFormat::Yaml => self.to_yaml(),
        }
    }
}
