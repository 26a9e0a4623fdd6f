//! Statement and query execution
//!
//! Every call opens its own connection through the [`StoreHandle`] and
//! closes it before returning. Failures are logged and returned; nothing
//! accumulated by a failed call is handed back.

use rusqlite::{Batch, Connection};

use super::source::SourceTables;
use crate::storage::{QueryResultSet, Row, StoreHandle, Value};
use crate::{Error, Operation, Result};

/// Runs caller-supplied SQL against a store handle
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor<'a> {
    handle: &'a StoreHandle,
}

impl QueryExecutor<'static> {
    /// Executor over the process-wide store handle
    pub fn global() -> Self {
        Self::new(StoreHandle::instance())
    }
}

impl<'a> QueryExecutor<'a> {
    pub fn new(handle: &'a StoreHandle) -> Self {
        Self { handle }
    }

    pub fn handle(&self) -> &'a StoreHandle {
        self.handle
    }

    /// Execute statement text that returns no rows.
    ///
    /// All statements in `sql` run in order; the first failure stops the
    /// batch. Whatever earlier statements applied stays applied.
    pub fn execute_statement(&self, sql: &str) -> Result<()> {
        let conn = self.handle.open_connection()?;
        conn.execute_batch(sql)
            .map_err(|source| execution_error(Operation::Statement, source))?;
        tracing::debug!("Statement executed against {}", self.handle.target());
        Ok(())
    }

    /// Execute query text and materialize every result set it produces.
    ///
    /// Result sets are keyed by the table they read; sets sharing a name
    /// accumulate rows in the order they were produced. `Ok` with an empty
    /// map means the text produced no result sets.
    pub fn execute_query(&self, sql: &str) -> Result<QueryResultSet> {
        let conn = self.handle.open_connection()?;
        let results = materialize(&conn, sql)
            .map_err(|source| execution_error(Operation::Query, source))?;
        tracing::debug!(
            "Query produced {} result sets ({} rows)",
            results.len(),
            results.total_rows()
        );
        Ok(results)
    }
}

fn materialize(conn: &Connection, sql: &str) -> rusqlite::Result<QueryResultSet> {
    let sources = SourceTables::attach(conn);
    let mut results = QueryResultSet::new();
    let mut batch = Batch::new(conn, sql);

    loop {
        sources.reset();
        let Some(mut stmt) = batch.next()? else {
            break;
        };

        let width = stmt.column_count();
        if width == 0 {
            stmt.execute([])?;
            continue;
        }

        let name = sources.result_name();
        let table = results.entry(&name, || {
            stmt.column_names().into_iter().map(String::from).collect()
        });

        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let values = (0..width)
                .map(|idx| row.get_ref(idx).map(Value::from))
                .collect::<rusqlite::Result<Row>>()?;
            table.rows.push(values);
        }
    }

    Ok(results)
}

fn execution_error(operation: Operation, source: rusqlite::Error) -> Error {
    tracing::error!("Error during database {}: {}", operation, source);
    Error::Execution { operation, source }
}
