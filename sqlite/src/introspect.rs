//! Catalog introspection.
//!
//! Reads the live structure of a database through SQLite's table-valued
//! pragmas: `pragma_table_list` for the tables of one attached schema and
//! `pragma_table_info` for the columns of each table. Table names are
//! bound as parameters, never spliced into SQL.
//!
//! Ordinary and virtual tables are listed. Views, FTS shadow tables, and
//! tables of other attached schemas are not.

use std::collections::BTreeSet;

use rusqlite::{Connection, params};
use schema_sync_core::{ColumnDef, SyncConfig};
use tracing::debug;

use crate::error::Result;
use crate::value::{Row, get, integer, optional_text, select, text};

const LIST_TABLES_SQL: &str =
    "SELECT name FROM pragma_table_list WHERE schema = ?1 AND type IN ('table', 'virtual')";

const TABLE_EXISTS_SQL: &str =
    "SELECT count(*) AS n FROM pragma_table_list WHERE schema = ?1 AND name = ?2";

const TABLE_INFO_SQL: &str = r#"SELECT cid, name, type, "notnull", dflt_value, pk
FROM pragma_table_info(?1, ?2)
ORDER BY cid"#;

/// Lists the ordinary tables of `config.database_schema`, excluding any
/// whose name carries `config.system_table_prefix`.
///
/// # Errors
///
/// Returns [`SyncError::DatabaseError`](crate::SyncError::DatabaseError) if
/// the catalog cannot be queried.
pub fn list_tables(conn: &Connection, config: &SyncConfig) -> Result<BTreeSet<String>> {
    let rows = select(conn, LIST_TABLES_SQL, params![config.database_schema])?;

    let mut tables = BTreeSet::new();
    for row in &rows {
        let name = text(row, "name")?;
        if config.is_system_table(&name) {
            continue;
        }
        tables.insert(name);
    }
    debug!(count = tables.len(), schema = %config.database_schema, "listed tables");
    Ok(tables)
}

/// Returns `true` if `schema` holds a table, view, or virtual table named
/// `table`.
pub fn table_exists(conn: &Connection, schema: &str, table: &str) -> Result<bool> {
    let row = get(conn, TABLE_EXISTS_SQL, params![schema, table])?;
    Ok(integer(&row, "n")? > 0)
}

/// Describes the columns of `table` in ordinal order.
///
/// A table that does not exist yields an empty list.
pub fn describe_table(conn: &Connection, config: &SyncConfig, table: &str) -> Result<Vec<ColumnDef>> {
    debug!(table, "describing table");
    select(conn, TABLE_INFO_SQL, params![table, config.database_schema])?
        .iter()
        .map(column_from_row)
        .collect()
}

fn column_from_row(row: &Row) -> Result<ColumnDef> {
    Ok(ColumnDef {
        cid: integer(row, "cid")?,
        name: text(row, "name")?,
        col_type: text(row, "type")?,
        not_null: integer(row, "notnull")? != 0,
        default_value: optional_text(row, "dflt_value")?.unwrap_or_default(),
        primary_key: integer(row, "pk")? != 0,
    })
}
