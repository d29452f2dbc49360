//! Schema descriptor types.
//!
//! This module defines the in-memory model of a desired schema: a mapping
//! from table name to an ordered list of column definitions. The same types
//! describe what the database reports about itself, so a schema extracted
//! from a live database can be fed straight back into a sync.
//!
//! The serialized field names (`cid`, `name`, `type`, `notnull`,
//! `dflt_value`, `pk`) mirror the columns SQLite's `table_info` pragma
//! returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ordered column list of a single table.
///
/// Column order is only significant when the table is created.
pub type TableSchema = Vec<ColumnDef>;

/// Shape of one column, either desired or observed.
///
/// # Examples
///
/// ```
/// use schema_sync_core::ColumnDef;
///
/// let id = ColumnDef::new("id", "INTEGER").primary_key();
/// let label = ColumnDef::new("label", "TEXT").not_null().with_default("'none'");
///
/// assert!(id.primary_key);
/// assert!(label.not_null);
/// assert!(label.has_default());
/// assert!(!id.has_default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Position of the column within its table.
    #[serde(default)]
    pub cid: i64,
    /// Column name, unique within the table.
    pub name: String,
    /// Engine-native type string, never parsed or normalized.
    #[serde(rename = "type", default)]
    pub col_type: String,
    /// Whether the column carries a `not null` constraint.
    #[serde(rename = "notnull", default, with = "flag")]
    pub not_null: bool,
    /// Default value expression; empty means no default.
    #[serde(rename = "dflt_value", default, with = "default_value")]
    pub default_value: String,
    /// Whether the column is the table's primary key.
    #[serde(rename = "pk", default, with = "flag")]
    pub primary_key: bool,
}

impl ColumnDef {
    /// Creates a nullable, non-key column without a default.
    pub fn new(name: impl Into<String>, col_type: impl Into<String>) -> Self {
        Self {
            cid: 0,
            name: name.into(),
            col_type: col_type.into(),
            not_null: false,
            default_value: String::new(),
            primary_key: false,
        }
    }

    /// Sets the column ordinal.
    pub fn with_cid(mut self, cid: i64) -> Self {
        self.cid = cid;
        self
    }

    /// Marks the column `not null`.
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets the default value expression, emitted verbatim.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Marks the column as the primary key.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Returns `true` if a default value is set.
    pub fn has_default(&self) -> bool {
        !self.default_value.is_empty()
    }
}

/// Desired schema: table name to ordered column list.
///
/// Tables are kept in a [`BTreeMap`], so iteration (and therefore sync
/// order) is lexicographic by table name.
///
/// # Examples
///
/// ```
/// use schema_sync_core::{ColumnDef, Schema};
///
/// let mut schema = Schema::new();
/// schema.insert_table(
///     "users",
///     vec![
///         ColumnDef::new("id", "INTEGER").primary_key(),
///         ColumnDef::new("email", "TEXT").not_null(),
///     ],
/// );
///
/// assert_eq!(schema.len(), 1);
/// assert_eq!(schema.primary_key("users").unwrap().name, "id");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    tables: BTreeMap<String, TableSchema>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a table definition.
    pub fn insert_table(&mut self, name: impl Into<String>, columns: TableSchema) {
        self.tables.insert(name.into(), columns);
    }

    /// Returns the columns of `name`, if the table is defined.
    pub fn table(&self, name: &str) -> Option<&[ColumnDef]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// Iterates over `(table name, columns)` pairs in table-name order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &[ColumnDef])> {
        self.tables
            .iter()
            .map(|(name, columns)| (name.as_str(), columns.as_slice()))
    }

    /// Iterates over table names in order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` if no tables are defined.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns the primary-key column of `table`.
    ///
    /// When several columns carry the flag the last one wins, matching
    /// what `create table` rendering emits.
    pub fn primary_key(&self, table: &str) -> Option<&ColumnDef> {
        self.tables
            .get(table)?
            .iter()
            .rev()
            .find(|c| c.primary_key)
    }
}

impl FromIterator<(String, TableSchema)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, TableSchema)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

/// 0/1 integer flags. Any non-zero integer or `true` reads as set.
mod flag {
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        struct FlagVisitor;

        impl Visitor<'_> for FlagVisitor {
            type Value = bool;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an integer flag or a boolean")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
                Ok(v != 0)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
                Ok(v != 0)
            }

            fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
                Ok(false)
            }
        }

        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Default values: `null` and `""` both mean "no default".
mod default_value {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_empty() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }
}
