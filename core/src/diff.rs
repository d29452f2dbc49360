//! Additive schema diffing.
//!
//! Compares a desired [`Schema`] against what the database reports and
//! produces the [`Action`]s needed to converge: create missing tables and
//! add missing columns. Nothing is ever dropped, renamed, or altered in
//! place. A column that exists by name is satisfied, whatever its type,
//! nullability, or default.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeSet;
//! use schema_sync_core::*;
//!
//! let mut desired = Schema::new();
//! desired.insert_table("t", vec![ColumnDef::new("id", "INTEGER"), ColumnDef::new("note", "TEXT")]);
//! desired.insert_table("u", vec![ColumnDef::new("id", "INTEGER")]);
//!
//! let existing: BTreeSet<String> = ["t".to_string()].into();
//! let actions = plan(&desired, &existing, |_table| {
//!     Ok::<_, std::convert::Infallible>(vec![ColumnDef::new("id", "INTEGER")])
//! });
//!
//! assert_eq!(actions.len(), 2);
//! assert!(matches!(&actions[0], Action::AddColumn { column, .. } if column.name == "note"));
//! assert!(matches!(&actions[1], Action::CreateTable { table, .. } if table == "u"));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use tracing::{debug, error};

use crate::types::{ColumnDef, Schema};

/// A single change needed to converge the database toward the desired
/// schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Create a table that does not exist yet, with all of its columns in
    /// definition order.
    CreateTable {
        table: String,
        columns: Vec<ColumnDef>,
    },
    /// Add a column missing from an existing table.
    AddColumn { table: String, column: ColumnDef },
}

impl Action {
    /// Name of the table the action touches.
    pub fn table(&self) -> &str {
        match self {
            Self::CreateTable { table, .. } | Self::AddColumn { table, .. } => table,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateTable { table, columns } => {
                write!(f, "create table {table} ({} columns)", columns.len())
            }
            Self::AddColumn { table, column } => {
                write!(f, "add column {} to table {table}", column.name)
            }
        }
    }
}

/// Diffs one existing table.
///
/// Emits an [`Action::AddColumn`] for every desired column whose name
/// (compared case-sensitively) is absent from `existing`, in desired
/// order. Existing columns not mentioned in `desired` are left alone.
pub fn diff_table(table: &str, desired: &[ColumnDef], existing: &[ColumnDef]) -> Vec<Action> {
    let present: HashSet<&str> = existing.iter().map(|c| c.name.as_str()).collect();

    desired
        .iter()
        .filter(|c| !present.contains(c.name.as_str()))
        .map(|c| Action::AddColumn {
            table: table.to_string(),
            column: c.clone(),
        })
        .collect()
}

/// Plans every action needed to converge `desired`, in table order then
/// column order.
///
/// Tables missing from `existing_tables` become a single
/// [`Action::CreateTable`]. For each existing table `describe` is called
/// to fetch its current columns; if it fails the error is logged and the
/// table is treated as having no columns, so every desired column is
/// planned as an addition.
pub fn plan<F, E>(desired: &Schema, existing_tables: &BTreeSet<String>, mut describe: F) -> Vec<Action>
where
    F: FnMut(&str) -> Result<Vec<ColumnDef>, E>,
    E: fmt::Display,
{
    let mut actions = Vec::new();

    for (table, columns) in desired.tables() {
        if !existing_tables.contains(table) {
            debug!(table, "table missing, planning create");
            actions.push(Action::CreateTable {
                table: table.to_string(),
                columns: columns.to_vec(),
            });
            continue;
        }

        let existing = describe(table).unwrap_or_else(|err| {
            error!(table, %err, "failed to describe table, treating it as having no columns");
            Vec::new()
        });
        debug!(table, existing = existing.len(), "described table");
        actions.extend(diff_table(table, columns, &existing));
    }

    actions
}
