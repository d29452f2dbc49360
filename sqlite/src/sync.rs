//! Sync and extract drivers.
//!
//! [`Synchronizer`] wires introspection, planning, rendering, and
//! application over one borrowed connection. The connection is owned by the
//! caller and closed when it goes out of scope.
//!
//! Statements target `config.database_schema`. For the default `main`
//! schema they stay unqualified unless a `temp` table of the same name
//! would capture them.
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use schema_sync_core::{ColumnDef, Schema, SyncConfig};
//! use schema_sync_sqlite::Synchronizer;
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let sync = Synchronizer::new(&conn, SyncConfig::default());
//!
//! let mut schema = Schema::new();
//! schema.insert_table("t", vec![ColumnDef::new("id", "INTEGER").primary_key()]);
//!
//! let report = sync.sync(&schema);
//! assert_eq!(report.tables_created, 1);
//!
//! // Already converged: nothing left to do.
//! assert!(sync.sync(&schema).is_converged());
//! assert_eq!(sync.extract().unwrap().table_names().collect::<Vec<_>>(), vec!["t"]);
//! ```

use std::collections::BTreeSet;

use rusqlite::Connection;
use schema_sync_core::{
    Action, DEFAULT_DATABASE_SCHEMA, Schema, SyncConfig, plan, render_in, validate_schema,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::apply::{FailedStatement, apply};
use crate::error::Result;
use crate::introspect::{describe_table, list_tables, table_exists};

/// Outcome of [`Synchronizer::sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Tables created successfully (or planned, in a dry run).
    pub tables_created: usize,
    /// Columns added successfully (or planned, in a dry run).
    pub columns_added: usize,
    /// Every statement generated, in execution order.
    pub statements: Vec<String>,
    /// Statements the database rejected.
    pub failed: Vec<FailedStatement>,
    /// Whether statements were only planned.
    pub dry_run: bool,
}

impl SyncReport {
    /// Returns `true` if nothing needed to change.
    pub fn is_converged(&self) -> bool {
        self.statements.is_empty()
    }

    fn count(&mut self, action: &Action) {
        match action {
            Action::CreateTable { .. } => self.tables_created += 1,
            Action::AddColumn { .. } => self.columns_added += 1,
        }
    }
}

/// Drives sync and extract against a single connection.
pub struct Synchronizer<'a> {
    conn: &'a Connection,
    config: SyncConfig,
}

impl<'a> Synchronizer<'a> {
    /// Creates a driver for `conn`.
    pub fn new(conn: &'a Connection, config: SyncConfig) -> Self {
        Self { conn, config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Plans the actions needed to converge on `desired` without executing
    /// anything.
    ///
    /// If the table list cannot be read the error is logged and every
    /// desired table is planned as new; a describe failure is handled the
    /// same way per table.
    pub fn plan(&self, desired: &Schema) -> Vec<Action> {
        let existing = self.existing_tables();
        plan(desired, &existing, |table| {
            describe_table(self.conn, &self.config, table)
        })
    }

    /// Renders `action` against the configured schema.
    pub fn render(&self, action: &Action) -> String {
        render_in(self.target_schema(action.table()), action)
    }

    /// Converges the database toward `desired`.
    ///
    /// Lint warnings are logged first. Statements that fail are logged and
    /// skipped; see [`SyncReport::failed`].
    pub fn sync(&self, desired: &Schema) -> SyncReport {
        for warning in validate_schema(desired) {
            warn!(%warning, "schema lint");
        }

        let actions = self.plan(desired);
        let mut report = SyncReport {
            dry_run: self.config.dry_run,
            ..SyncReport::default()
        };

        for action in &actions {
            let statement = self.render(action);
            report.statements.push(statement.clone());

            if self.config.dry_run {
                info!(%statement, "dry run");
                report.count(action);
                continue;
            }

            let applied = apply(self.conn, [statement.as_str()]);
            if applied.is_success() {
                match action {
                    Action::CreateTable { table, .. } => info!(%table, "created table"),
                    Action::AddColumn { table, column } => {
                        info!(%table, column = %column.name, "added column")
                    }
                }
                report.count(action);
            }
            report.failed.extend(applied.failed);
        }

        info!(
            tables_created = report.tables_created,
            columns_added = report.columns_added,
            failed = report.failed.len(),
            "sync finished"
        );
        report
    }

    /// Builds a schema descriptor from the live database.
    ///
    /// A table that cannot be described is logged and extracted with no
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::DatabaseError`](crate::SyncError::DatabaseError)
    /// if the table list cannot be read.
    pub fn extract(&self) -> Result<Schema> {
        let tables = list_tables(self.conn, &self.config)?;

        let mut schema = Schema::new();
        for table in tables {
            let columns = describe_table(self.conn, &self.config, &table).unwrap_or_else(|err| {
                error!(%table, %err, "failed to describe table");
                Vec::new()
            });
            schema.insert_table(table, columns);
        }
        info!(tables = schema.len(), "extracted schema");
        Ok(schema)
    }

    fn target_schema(&self, table: &str) -> Option<&str> {
        let schema = self.config.database_schema.as_str();
        if schema != DEFAULT_DATABASE_SCHEMA {
            return Some(schema);
        }
        // Unqualified names resolve to temp before main.
        match table_exists(self.conn, "temp", table) {
            Ok(false) => None,
            _ => Some(schema),
        }
    }

    fn existing_tables(&self) -> BTreeSet<String> {
        list_tables(self.conn, &self.config).unwrap_or_else(|err| {
            error!(%err, "failed to list tables, treating database as empty");
            BTreeSet::new()
        })
    }
}
