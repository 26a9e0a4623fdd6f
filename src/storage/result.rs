//! Materialized query results

use indexmap::IndexMap;
use serde::Serialize;

use super::value::Value;

/// One row: column values in select-list order
pub type Row = Vec<Value>;

/// Rows gathered under one result-set name
///
/// Serializes as the bare row list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultTable {
    /// Column names reported by the statement that created the entry
    #[serde(skip)]
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ordered mapping from result-set name to its rows.
///
/// Names are unique; iteration follows the order in which the engine
/// produced each name for the first time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryResultSet {
    tables: IndexMap<String, ResultTable>,
}

impl QueryResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `name`, created with `columns` if absent.
    ///
    /// An existing entry keeps its rows and column names, so result sets
    /// sharing a name accumulate into one sequence.
    pub fn entry(&mut self, name: &str, columns: impl FnOnce() -> Vec<String>) -> &mut ResultTable {
        self.tables
            .entry(name.to_string())
            .or_insert_with(|| ResultTable::new(columns()))
    }

    pub fn get(&self, name: &str) -> Option<&ResultTable> {
        self.tables.get(name)
    }

    /// Rows for `name`, if the query produced that result set
    pub fn rows(&self, name: &str) -> Option<&[Row]> {
        self.get(name).map(|t| t.rows.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultTable)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    /// Number of distinct result-set names
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Rows across every result set
    pub fn total_rows(&self) -> usize {
        self.tables.values().map(ResultTable::len).sum()
    }

    pub fn into_tables(self) -> IndexMap<String, ResultTable> {
        self.tables
    }
}

impl<'a> IntoIterator for &'a QueryResultSet {
    type Item = (&'a str, &'a ResultTable);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a ResultTable)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
