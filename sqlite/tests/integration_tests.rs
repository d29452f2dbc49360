//! Integration tests for the schema-sync-sqlite crate.

use rusqlite::Connection;
use schema_sync_core::{Action, ColumnDef, Schema, SyncConfig, render};
use schema_sync_sqlite::{Synchronizer, apply, describe_table, list_tables};

fn config() -> SyncConfig {
    SyncConfig::default()
}

/// Schema with one new-style table and one table that grows a column.
fn app_schema() -> Schema {
    let mut schema = Schema::new();
    schema.insert_table(
        "users",
        vec![
            ColumnDef::new("id", "INTEGER").primary_key(),
            ColumnDef::new("email", "TEXT").with_cid(1).not_null(),
            ColumnDef::new("nickname", "TEXT")
                .with_cid(2)
                .with_default("'anon'"),
        ],
    );
    schema.insert_table(
        "posts",
        vec![
            ColumnDef::new("id", "INTEGER").primary_key(),
            ColumnDef::new("body", "TEXT").with_cid(1),
        ],
    );
    schema
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    describe_table(conn, &config(), table)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect()
}

#[test]
fn sync_creates_missing_tables() {
    let conn = Connection::open_in_memory().unwrap();
    let report = Synchronizer::new(&conn, config()).sync(&app_schema());

    assert_eq!(report.tables_created, 2);
    assert_eq!(report.columns_added, 0);
    assert!(report.failed.is_empty());

    let tables: Vec<_> = list_tables(&conn, &config()).unwrap().into_iter().collect();
    assert_eq!(tables, vec!["posts", "users"]);
    assert_eq!(column_names(&conn, "users"), vec!["id", "email", "nickname"]);
}

#[test]
fn sync_is_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    let sync = Synchronizer::new(&conn, config());
    let schema = app_schema();

    let first = sync.sync(&schema);
    assert!(!first.is_converged());
    let after_first = sync.extract().unwrap();

    let second = sync.sync(&schema);
    assert!(second.is_converged());
    assert!(second.failed.is_empty());
    assert_eq!(sync.extract().unwrap(), after_first);
}

#[test]
fn sync_only_adds() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, email INTEGER, legacy BLOB);
         CREATE TABLE audit (entry TEXT);
         INSERT INTO users (id, email, legacy) VALUES (1, 42, x'00');",
    )
    .unwrap();
    let sync = Synchronizer::new(&conn, config());
    let before = sync.extract().unwrap();

    let report = sync.sync(&app_schema());
    assert_eq!(report.tables_created, 1);
    assert_eq!(report.columns_added, 1);

    let after = sync.extract().unwrap();
    for (table, columns) in before.tables() {
        let now = after.table(table).expect("table survives sync");
        for column in columns {
            let kept = now.iter().find(|c| c.name == column.name).expect("column survives sync");
            assert_eq!(kept.col_type, column.col_type);
        }
    }
    assert!(after.table("audit").is_some());

    // Existing data is untouched; the added column picks up its default.
    let (email, nickname): (i64, String) = conn
        .query_row("SELECT email, nickname FROM users WHERE id = 1", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .unwrap();
    assert_eq!(email, 42);
    assert_eq!(nickname, "anon");
}

#[test]
fn create_table_statement_declares_columns_and_primary_key() {
    let action = Action::CreateTable {
        table: "things".to_string(),
        columns: vec![
            ColumnDef::new("id", "INTEGER").primary_key(),
            ColumnDef::new("label", "TEXT").with_cid(1).not_null(),
        ],
    };
    let statement = render(&action);
    assert_eq!(
        statement,
        r#"create table "things" ("id" INTEGER, "label" TEXT not null, primary key ("id"))"#
    );

    let conn = Connection::open_in_memory().unwrap();
    assert!(apply(&conn, [statement]).is_success());
    let columns = describe_table(&conn, &config(), "things").unwrap();
    assert!(columns[0].primary_key);
    assert!(columns[1].not_null);
}

#[test]
fn add_column_statement_and_effect() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let mut schema = Schema::new();
    schema.insert_table(
        "t",
        vec![
            ColumnDef::new("id", "INTEGER"),
            ColumnDef::new("note", "TEXT").with_default("'x'"),
        ],
    );

    let report = Synchronizer::new(&conn, config()).sync(&schema);
    assert_eq!(
        report.statements,
        vec![r#"alter table "t" add column "note" TEXT default 'x'"#]
    );
    assert_eq!(column_names(&conn, "t"), vec!["id", "note"]);
}

#[test]
fn missing_column_detection_is_name_only() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE people (age INTEGER)").unwrap();

    let mut schema = Schema::new();
    schema.insert_table(
        "people",
        vec![ColumnDef::new("age", "TEXT").not_null().with_default("'0'")],
    );

    let sync = Synchronizer::new(&conn, config());
    assert!(sync.plan(&schema).is_empty());
    assert!(sync.sync(&schema).is_converged());
}

#[test]
fn added_not_null_column_stays_nullable() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let mut schema = Schema::new();
    schema.insert_table(
        "t",
        vec![
            ColumnDef::new("id", "INTEGER"),
            ColumnDef::new("flag", "INTEGER").not_null().with_default("0"),
        ],
    );

    let report = Synchronizer::new(&conn, config()).sync(&schema);
    assert_eq!(report.columns_added, 1);
    let flag = describe_table(&conn, &config(), "t").unwrap().pop().unwrap();
    assert_eq!(flag.name, "flag");
    assert!(!flag.not_null);
    assert_eq!(flag.default_value, "0");
}

#[test]
fn failed_statement_is_retried_on_rerun() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();

    let mut schema = Schema::new();
    schema.insert_table(
        "t",
        vec![
            ColumnDef::new("id", "INTEGER"),
            ColumnDef::new("bad", "TEXT").with_default("oops oops"),
            ColumnDef::new("good", "TEXT"),
        ],
    );
    let sync = Synchronizer::new(&conn, config());

    let first = sync.sync(&schema);
    assert_eq!(first.columns_added, 1);
    assert_eq!(first.failed.len(), 1);

    // Only the failed addition is planned again.
    let second = sync.sync(&schema);
    assert_eq!(second.columns_added, 0);
    assert_eq!(second.statements, vec![first.failed[0].statement.clone()]);
    assert_eq!(second.failed, first.failed);
}

#[test]
fn extract_round_trip_into_empty_database() {
    let source = Connection::open_in_memory().unwrap();
    source
        .execute_batch(
            "CREATE TABLE pets (id INTEGER PRIMARY KEY, name TEXT NOT NULL DEFAULT 'rex');",
        )
        .unwrap();
    let extracted = Synchronizer::new(&source, config()).extract().unwrap();

    let json = extracted.to_json_pretty().unwrap();
    let reparsed = Schema::from_json_str(&json).unwrap();
    assert_eq!(reparsed, extracted);

    let target = Connection::open_in_memory().unwrap();
    let report = Synchronizer::new(&target, config()).sync(&reparsed);
    assert_eq!(report.tables_created, 1);
    assert!(report.failed.is_empty());

    let rebuilt = Synchronizer::new(&target, config()).extract().unwrap();
    let expected: Vec<_> = extracted
        .table("pets")
        .unwrap()
        .iter()
        .map(|c| (c.name.clone(), c.col_type.clone(), c.primary_key))
        .collect();
    let actual: Vec<_> = rebuilt
        .table("pets")
        .unwrap()
        .iter()
        .map(|c| (c.name.clone(), c.col_type.clone(), c.primary_key))
        .collect();
    assert_eq!(actual, expected);
    assert_eq!(rebuilt, extracted);
}

#[test]
fn extract_skips_system_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE counters (id INTEGER PRIMARY KEY AUTOINCREMENT, n INTEGER);
         INSERT INTO counters (n) VALUES (1);",
    )
    .unwrap();
    let schema = Synchronizer::new(&conn, config()).extract().unwrap();
    assert_eq!(schema.table_names().collect::<Vec<_>>(), vec!["counters"]);
}

#[test]
fn sync_against_file_database_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.db");

    {
        let conn = Connection::open(&path).unwrap();
        Synchronizer::new(&conn, config()).sync(&app_schema());
    }

    let conn = Connection::open(&path).unwrap();
    let report = Synchronizer::new(&conn, config()).sync(&app_schema());
    assert!(report.is_converged());
}

#[test]
fn sync_into_attached_schema_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let aux_path = dir.path().join("aux.db");

    let conn = Connection::open_in_memory().unwrap();
    conn.execute("ATTACH DATABASE ?1 AS aux", [aux_path.to_str().unwrap()])
        .unwrap();
    let aux = SyncConfig {
        database_schema: "aux".to_string(),
        ..SyncConfig::default()
    };
    let sync = Synchronizer::new(&conn, aux.clone());

    let first = sync.sync(&app_schema());
    assert_eq!(first.tables_created, 2);
    assert!(first.failed.is_empty());
    assert!(
        first
            .statements
            .iter()
            .all(|s| s.starts_with(r#"create table "aux"."#))
    );

    let second = sync.sync(&app_schema());
    assert!(second.is_converged(), "{:?}", second.statements);

    assert!(list_tables(&conn, &config()).unwrap().is_empty());
    assert_eq!(list_tables(&conn, &aux).unwrap().len(), 2);
}

#[test]
fn existing_virtual_table_is_not_recreated() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE VIRTUAL TABLE docs USING fts5(body);")
        .unwrap();
    let mut schema = Schema::new();
    schema.insert_table("docs", vec![ColumnDef::new("body", "")]);

    let report = Synchronizer::new(&conn, config()).sync(&schema);
    assert!(report.is_converged(), "{:?}", report.statements);
}
