//! Loosely-typed row scanning.
//!
//! Reads query results into [`Row`]s, mapping column names to a closed
//! [`Value`] union of SQLite's storage classes. Catalog pragmas return a
//! handful of differently-shaped rows; scanning them generically keeps the
//! introspector free of per-query structs.
//!
//! # Example
//!
//! ```
//! use rusqlite::Connection;
//! use schema_sync_sqlite::{Value, select};
//!
//! let conn = Connection::open_in_memory().unwrap();
//! let rows = select(&conn, "SELECT 1 AS one, 'a' AS letter, NULL AS nothing", []).unwrap();
//!
//! assert_eq!(rows[0]["one"], Value::Integer(1));
//! assert_eq!(rows[0]["letter"].as_str(), Some("a"));
//! assert!(rows[0]["nothing"].is_null());
//! ```

use std::collections::HashMap;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params};
use serde::{Serialize, Serializer};

use crate::error::{Result, SyncError};

/// A single SQLite value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns `true` for SQL `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the integer, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Storage class name, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(v) => Self::Integer(v),
            ValueRef::Real(v) => Self::Real(v),
            ValueRef::Text(v) => Self::Text(String::from_utf8_lossy(v).into_owned()),
            ValueRef::Blob(v) => Self::Blob(v.to_vec()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Real(v) => serializer.serialize_f64(*v),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Blob(v) => serializer.serialize_bytes(v),
        }
    }
}

/// One result row: column name to value.
pub type Row = HashMap<String, Value>;

/// Runs `sql` and collects every row.
///
/// # Errors
///
/// Returns [`SyncError::DatabaseError`] if the statement cannot be prepared
/// or stepping fails.
pub fn select<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params)?;
    let mut results = Vec::new();
    while let Some(row) = rows.next()? {
        let mut dest = Row::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            dest.insert(column.clone(), Value::from(row.get_ref(i)?));
        }
        results.push(dest);
    }
    Ok(results)
}

/// Runs `sql` and returns the first row.
///
/// # Errors
///
/// Returns [`SyncError::NoRows`] if the query produced nothing.
pub fn get<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Row> {
    select(conn, sql, params)?
        .into_iter()
        .next()
        .ok_or(SyncError::NoRows)
}

fn field<'a>(row: &'a Row, name: &str) -> Result<&'a Value> {
    row.get(name).ok_or_else(|| SyncError::UnexpectedValue {
        field: name.to_string(),
        detail: "missing from row".to_string(),
    })
}

fn mismatch(name: &str, expected: &str, found: &Value) -> SyncError {
    SyncError::UnexpectedValue {
        field: name.to_string(),
        detail: format!("expected {expected}, found {}", found.kind()),
    }
}

/// Reads a text field.
pub fn text(row: &Row, name: &str) -> Result<String> {
    let value = field(row, name)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(name, "text", value))
}

/// Reads a text field that may be `NULL`.
pub fn optional_text(row: &Row, name: &str) -> Result<Option<String>> {
    match field(row, name)? {
        Value::Null => Ok(None),
        Value::Text(v) => Ok(Some(v.clone())),
        other => Err(mismatch(name, "text or null", other)),
    }
}

/// Reads an integer field.
pub fn integer(row: &Row, name: &str) -> Result<i64> {
    let value = field(row, name)?;
    value.as_i64().ok_or_else(|| mismatch(name, "integer", value))
}
