//! Desired-schema lint.
//!
//! Catches descriptor mistakes that would otherwise only show up as a
//! failed or surprising DDL statement: empty names, duplicate columns,
//! competing primary keys, and `not null` columns that cannot be added to an
//! existing table. Findings are warnings; a sync still runs.
//!
//! # Examples
//!
//! ```
//! use schema_sync_core::*;
//!
//! let mut schema = Schema::new();
//! schema.insert_table("t", vec![ColumnDef::new("id", "INTEGER").primary_key()]);
//! assert!(validate_schema(&schema).is_empty());
//!
//! schema.insert_table("u", vec![
//!     ColumnDef::new("a", "INTEGER").primary_key(),
//!     ColumnDef::new("b", "INTEGER").primary_key(),
//! ]);
//! assert!(matches!(
//!     validate_schema(&schema)[0],
//!     ValidationWarning::MultiplePrimaryKeys { .. }
//! ));
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::types::Schema;

/// A problem found in a desired schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    /// Table name is empty or whitespace-only.
    #[error("table name cannot be empty")]
    EmptyTableName,
    /// Table defines no columns, so `create table` would be rejected.
    #[error("table '{0}' has no columns")]
    NoColumns(String),
    /// Column name is empty or whitespace-only.
    #[error("table '{0}' has a column with an empty name")]
    EmptyColumnName(String),
    /// Two columns in the same table share a name.
    #[error("table '{table}' defines column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },
    /// More than one column claims the primary key; the last one is used.
    #[error("table '{table}' flags {count} primary-key columns; only '{used}' will be used")]
    MultiplePrimaryKeys {
        table: String,
        count: usize,
        used: String,
    },
    /// A `not null` column without a default. Added columns drop the
    /// constraint; created tables keep it.
    #[error("column '{table}.{column}' is not null without a default; it stays nullable if added to an existing table")]
    NotNullWithoutDefault { table: String, column: String },
}

/// Lints every table of `schema`, in table order.
pub fn validate_schema(schema: &Schema) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (table, columns) in schema.tables() {
        if table.trim().is_empty() {
            warnings.push(ValidationWarning::EmptyTableName);
        }
        if columns.is_empty() {
            warnings.push(ValidationWarning::NoColumns(table.to_string()));
            continue;
        }

        let mut seen = HashSet::new();
        for column in columns {
            if column.name.trim().is_empty() {
                warnings.push(ValidationWarning::EmptyColumnName(table.to_string()));
                continue;
            }
            if !seen.insert(column.name.as_str()) {
                warnings.push(ValidationWarning::DuplicateColumn {
                    table: table.to_string(),
                    column: column.name.clone(),
                });
            }
            if column.not_null && !column.has_default() && !column.primary_key {
                warnings.push(ValidationWarning::NotNullWithoutDefault {
                    table: table.to_string(),
                    column: column.name.clone(),
                });
            }
        }

        let keys: Vec<_> = columns.iter().filter(|c| c.primary_key).collect();
        if keys.len() > 1 {
            warnings.push(ValidationWarning::MultiplePrimaryKeys {
                table: table.to_string(),
                count: keys.len(),
                used: keys[keys.len() - 1].name.clone(),
            });
        }
    }

    warnings
}
