//! Declarative table schemas and additive schema diffing.
//!
//! This crate is the engine-agnostic half of schema sync:
//!
//! - [`Schema`] / [`ColumnDef`] — the desired (or extracted) schema: table
//!   names mapped to ordered column lists, serialized as JSON or YAML.
//! - [`plan`] / [`diff_table`] — compare a desired schema with what the
//!   database reports and produce [`Action`]s. Only additions are ever
//!   planned: missing tables are created, missing columns are added, and
//!   nothing existing is touched.
//! - [`render`] / [`SqlBuilder`] — turn actions into DDL statements.
//! - [`validate_schema`] — lint a desired schema before syncing.
//! - [`SyncConfig`] — run settings loaded from YAML.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeSet;
//! use schema_sync_core::*;
//!
//! let schema = Schema::from_json_str(r#"{
//!     "items": [
//!         {"cid": 0, "name": "id", "type": "INTEGER", "notnull": 0, "dflt_value": null, "pk": 1},
//!         {"cid": 1, "name": "label", "type": "TEXT", "notnull": 1, "dflt_value": null, "pk": 0}
//!     ]
//! }"#).unwrap();
//!
//! let actions = plan(&schema, &BTreeSet::new(), |_| Ok::<_, SchemaError>(Vec::new()));
//! assert_eq!(
//!     render_all(&actions),
//!     vec![r#"create table "items" ("id" INTEGER, "label" TEXT not null, primary key ("id"))"#]
//! );
//! ```

mod config;
mod ddl;
mod diff;
mod error;
mod file;
mod types;
mod validate;

pub use config::{DEFAULT_DATABASE_SCHEMA, DEFAULT_SYSTEM_TABLE_PREFIX, SyncConfig};
pub use ddl::{
    SqlBuilder, add_column, add_column_in, column_clause, create_table, create_table_in,
    quote_ident, render, render_all, render_in,
};
pub use diff::{Action, diff_table, plan};
pub use error::{Result, SchemaError};
pub use file::SchemaFormat;
pub use types::{ColumnDef, Schema, TableSchema};
pub use validate::{ValidationWarning, validate_schema};
