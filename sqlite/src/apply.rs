//! Best-effort statement application.
//!
//! Each statement runs on its own, outside any transaction, so every
//! successful statement commits immediately. A failure is logged and
//! recorded, and the remaining statements still run. Re-running a sync
//! re-plans whatever did not take effect.

use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, error};

/// A statement the database rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedStatement {
    /// The SQL that was attempted.
    pub statement: String,
    /// Error reported by SQLite.
    pub error: String,
}

/// Outcome of [`apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Number of statements that succeeded.
    pub executed: usize,
    /// Statements that failed, in execution order.
    pub failed: Vec<FailedStatement>,
}

impl ApplyReport {
    /// Returns `true` if every statement succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Executes `statements` in order, continuing past failures.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use schema_sync_sqlite::apply;
///
/// let conn = Connection::open_in_memory().unwrap();
/// let report = apply(&conn, [
///     r#"create table "t" ("id" INTEGER)"#,
///     "this is not sql",
///     r#"alter table "t" add column "note" TEXT"#,
/// ]);
///
/// assert_eq!(report.executed, 2);
/// assert_eq!(report.failed.len(), 1);
/// ```
pub fn apply<I, S>(conn: &Connection, statements: I) -> ApplyReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ApplyReport::default();

    for statement in statements {
        let statement = statement.as_ref();
        debug!(statement, "executing");
        match conn.execute_batch(statement) {
            Ok(()) => report.executed += 1,
            Err(err) => {
                error!(statement, %err, "statement failed");
                report.failed.push(FailedStatement {
                    statement: statement.to_string(),
                    error: err.to_string(),
                });
            }
        }
    }

    report
}
