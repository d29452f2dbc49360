//! SQLite backend for declarative schema sync.
//!
//! This crate applies a [`Schema`](schema_sync_core::Schema) to a live
//! SQLite database and extracts one back out of it.
//!
//! # Architecture
//!
//! - **`value`** — generic row scanning into [`Row`] / [`Value`]
//! - **`introspect`** — table and column metadata from the catalog pragmas
//! - **`apply`** — best-effort, statement-by-statement execution
//! - **`sync`** — [`Synchronizer`], tying the above to the core planner
//!
//! # Quick start — sync
//!
//! ```no_run
//! use rusqlite::Connection;
//! use schema_sync_core::{Schema, SyncConfig};
//! use schema_sync_sqlite::Synchronizer;
//!
//! let schema = Schema::load("schema.json").unwrap();
//! let conn = Connection::open("app.db").unwrap();
//!
//! let report = Synchronizer::new(&conn, SyncConfig::default()).sync(&schema);
//! println!("{} tables created, {} columns added", report.tables_created, report.columns_added);
//! ```
//!
//! # Quick start — extract
//!
//! ```no_run
//! use rusqlite::Connection;
//! use schema_sync_core::SyncConfig;
//! use schema_sync_sqlite::Synchronizer;
//!
//! let conn = Connection::open("app.db").unwrap();
//! let schema = Synchronizer::new(&conn, SyncConfig::default()).extract().unwrap();
//! println!("{}", schema.to_json_pretty().unwrap());
//! ```

mod apply;
mod error;
mod introspect;
mod sync;
mod value;

pub use apply::{ApplyReport, FailedStatement, apply};
pub use error::{Result, SyncError};
pub use introspect::{describe_table, list_tables, table_exists};
pub use sync::{SyncReport, Synchronizer};
pub use value::{Row, Value, get, integer, optional_text, select, text};
