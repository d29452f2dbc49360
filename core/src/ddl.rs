//! DDL rendering.
//!
//! Turns [`Action`]s into SQL statements. Statements are assembled with
//! [`SqlBuilder`], which keeps quoting and fragment separators in one
//! place. Identifiers are always double-quoted; type names and default
//! expressions are trusted input and emitted verbatim.
//!
//! Rendering rules:
//!
//! - `create table "<t>" (<col>, ..., primary key ("<pk>"))`, where each
//!   column is `"<name>" <type>[ not null][ default <value>]` and the
//!   primary-key clause names the last column flagged `pk`, if any.
//! - `alter table "<t>" add column "<name>" <type>[ default <value>]`.
//!   Added columns never carry `not null`; SQLite rejects a `not null`
//!   addition without a default, and the flag is dropped rather than
//!   special-cased.
//!
//! The `*_in` variants take an optional schema name and emit
//! `"<schema>"."<t>"` when one is given; the plain forms are unqualified.

use crate::diff::Action;
use crate::types::ColumnDef;

/// Double-quotes an identifier, doubling any embedded quote.
///
/// # Examples
///
/// ```
/// use schema_sync_core::quote_ident;
///
/// assert_eq!(quote_ident("users"), r#""users""#);
/// assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Space-separated statement fragments.
///
/// Empty fragments are skipped, so optional clauses can be pushed
/// unconditionally.
///
/// # Examples
///
/// ```
/// use schema_sync_core::SqlBuilder;
///
/// let sql = SqlBuilder::new()
///     .keyword("create table")
///     .ident("t")
///     .list(["\"a\" TEXT".to_string(), "\"b\" INTEGER".to_string()])
///     .build();
/// assert_eq!(sql, r#"create table "t" ("a" TEXT, "b" INTEGER)"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    fragments: Vec<String>,
}

impl SqlBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a keyword or keyword phrase.
    pub fn keyword(self, keyword: &str) -> Self {
        self.raw(keyword)
    }

    /// Appends a quoted identifier.
    pub fn ident(self, name: &str) -> Self {
        self.raw(&quote_ident(name))
    }

    /// Appends `"<schema>"."<name>"`, or just `"<name>"` without a schema.
    pub fn qualified_ident(self, schema: Option<&str>, name: &str) -> Self {
        match schema {
            Some(schema) => self.raw(&format!("{}.{}", quote_ident(schema), quote_ident(name))),
            None => self.ident(name),
        }
    }

    /// Appends a fragment verbatim. Empty fragments are ignored.
    pub fn raw(mut self, fragment: &str) -> Self {
        if !fragment.is_empty() {
            self.fragments.push(fragment.to_string());
        }
        self
    }

    /// Appends a parenthesised, comma-separated list.
    pub fn list<I>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let items: Vec<String> = items.into_iter().collect();
        self.fragments.push(format!("({})", items.join(", ")));
        self
    }

    /// Appends `keyword fragment` only when `fragment` is non-empty.
    pub fn clause(self, keyword: &str, fragment: &str) -> Self {
        if fragment.is_empty() {
            self
        } else {
            self.keyword(keyword).raw(fragment)
        }
    }

    /// Appends `keyword` only when `enabled`.
    pub fn flag(self, enabled: bool, keyword: &str) -> Self {
        if enabled { self.keyword(keyword) } else { self }
    }

    /// Joins the fragments with single spaces.
    pub fn build(self) -> String {
        self.fragments.join(" ")
    }
}

/// Renders a column definition inside `create table`.
///
/// # Examples
///
/// ```
/// use schema_sync_core::{ColumnDef, column_clause};
///
/// let col = ColumnDef::new("label", "TEXT").not_null().with_default("'x'");
/// assert_eq!(column_clause(&col), r#""label" TEXT not null default 'x'"#);
/// ```
pub fn column_clause(column: &ColumnDef) -> String {
    SqlBuilder::new()
        .ident(&column.name)
        .raw(&column.col_type)
        .flag(column.not_null, "not null")
        .clause("default", &column.default_value)
        .build()
}

/// Renders `create table` for `columns` in the given order.
pub fn create_table(table: &str, columns: &[ColumnDef]) -> String {
    create_table_in(None, table, columns)
}

/// Renders `create table` targeting `schema` when given.
///
/// # Examples
///
/// ```
/// use schema_sync_core::{ColumnDef, create_table_in};
///
/// let columns = [ColumnDef::new("id", "INTEGER")];
/// assert_eq!(
///     create_table_in(Some("aux"), "t", &columns),
///     r#"create table "aux"."t" ("id" INTEGER)"#
/// );
/// ```
pub fn create_table_in(schema: Option<&str>, table: &str, columns: &[ColumnDef]) -> String {
    let mut items: Vec<String> = columns.iter().map(column_clause).collect();

    if let Some(pk) = columns.iter().rev().find(|c| c.primary_key) {
        items.push(
            SqlBuilder::new()
                .keyword("primary key")
                .list([quote_ident(&pk.name)])
                .build(),
        );
    }

    SqlBuilder::new()
        .keyword("create table")
        .qualified_ident(schema, table)
        .list(items)
        .build()
}

/// Renders `alter table ... add column`, without any `not null` clause.
pub fn add_column(table: &str, column: &ColumnDef) -> String {
    add_column_in(None, table, column)
}

/// Renders `alter table ... add column` targeting `schema` when given.
pub fn add_column_in(schema: Option<&str>, table: &str, column: &ColumnDef) -> String {
    SqlBuilder::new()
        .keyword("alter table")
        .qualified_ident(schema, table)
        .keyword("add column")
        .ident(&column.name)
        .raw(&column.col_type)
        .clause("default", &column.default_value)
        .build()
}

/// Renders a single action.
pub fn render(action: &Action) -> String {
    render_in(None, action)
}

/// Renders a single action against `schema` when given.
pub fn render_in(schema: Option<&str>, action: &Action) -> String {
    match action {
        Action::CreateTable { table, columns } => create_table_in(schema, table, columns),
        Action::AddColumn { table, column } => add_column_in(schema, table, column),
    }
}

/// Renders actions in order.
pub fn render_all(actions: &[Action]) -> Vec<String> {
    actions.iter().map(render).collect()
}
