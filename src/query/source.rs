//! Result-set naming
//!
//! SQLite reports, through its authorizer, every table a statement reads
//! while it is being compiled. The first one names the result set: for a
//! view that is the view's underlying table, and a scalar subquery or a
//! join names the set after whichever table the first result column reads.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use rusqlite::hooks::{AuthAction, AuthContext, Authorization};

/// Name used for result sets that read no table (`SELECT 1`)
pub const UNNAMED_RESULT: &str = "result";

/// Authorizer hook recording the first table read since the last reset.
///
/// Detached again when dropped.
pub(crate) struct SourceTables<'c> {
    conn: &'c Connection,
    first: Arc<Mutex<Option<String>>>,
}

impl<'c> SourceTables<'c> {
    pub fn attach(conn: &'c Connection) -> Self {
        let first = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&first);

        conn.authorizer(Some(move |ctx: AuthContext<'_>| {
            if let (AuthAction::Read { table_name, .. }, Ok(mut first)) = (ctx.action, sink.lock()) {
                first.get_or_insert_with(|| table_name.to_string());
            }
            Authorization::Allow
        }));

        Self { conn, first }
    }

    /// Forget the table seen for the previous statement
    pub fn reset(&self) {
        if let Ok(mut first) = self.first.lock() {
            *first = None;
        }
    }

    /// Name for the statement compiled since the last reset
    pub fn result_name(&self) -> String {
        self.first
            .lock()
            .ok()
            .and_then(|first| first.clone())
            .unwrap_or_else(|| UNNAMED_RESULT.to_string())
    }
}

impl Drop for SourceTables<'_> {
    fn drop(&mut self) {
        self.conn
            .authorizer(None::<fn(AuthContext<'_>) -> Authorization>);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_for(conn: &Connection, sql: &str) -> String {
        let sources = SourceTables::attach(conn);
        sources.reset();
        let _stmt = conn.prepare(sql).unwrap();
        sources.result_name()
    }

    #[test]
    fn test_names_from_first_table_read() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE Items (id INTEGER, name TEXT); CREATE TABLE Owners (id INTEGER);")
            .unwrap();

        assert_eq!(names_for(&conn, "SELECT * FROM Items"), "Items");
        assert_eq!(names_for(&conn, "SELECT id FROM Owners WHERE id > 1"), "Owners");
        assert_eq!(names_for(&conn, "SELECT count(*) FROM Items"), "Items");
    }

    #[test]
    fn test_names_follow_first_result_column() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Items (id INTEGER, name TEXT); \
             CREATE TABLE Players (id INTEGER, nick TEXT, item_id INTEGER); \
             CREATE VIEW Armory AS SELECT name FROM Items;",
        )
        .unwrap();

        assert_eq!(
            names_for(&conn, "SELECT (SELECT name FROM Items LIMIT 1), nick FROM Players"),
            "Items"
        );
        assert_eq!(
            names_for(&conn, "SELECT i.name, p.nick FROM Players p JOIN Items i ON i.id = p.item_id"),
            "Items"
        );
        assert_eq!(names_for(&conn, "SELECT * FROM Armory"), "Items");
        assert_eq!(names_for(&conn, "SELECT 1 FROM Players"), "Players");
    }

    #[test]
    fn test_unnamed_result() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(names_for(&conn, "SELECT 1, 'two'"), UNNAMED_RESULT);
    }

    #[test]
    fn test_reset_between_statements() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE A (x); CREATE TABLE B (y);").unwrap();

        let sources = SourceTables::attach(&conn);
        let _a = conn.prepare("SELECT x FROM A").unwrap();
        assert_eq!(sources.result_name(), "A");

        sources.reset();
        let _b = conn.prepare("SELECT y FROM B").unwrap();
        assert_eq!(sources.result_name(), "B");
    }
}
