//! # GameData - embedded SQLite access layer
//!
//! A single process-wide access point to the game's SQLite database.
//!
//! GameData provides:
//! - A store handle owning the database location and scoped connections
//! - Statement execution with failure containment
//! - Query execution materializing every result set into a name -> rows map
//! - Tagged column values that keep SQLite's native storage classes

pub mod config;
pub mod storage;
pub mod query;
pub mod ui;

// Re-exports for convenient access
pub use config::GameDataConfig;
pub use storage::{QueryResultSet, ResultTable, Row, ScopedConnection, StoreHandle, StoreOptions, Value};
pub use query::QueryExecutor;

/// Result type alias for GameData operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of data-layer operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Statement,
    Query,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Statement => write!(f, "statement"),
            Operation::Query => write!(f, "query"),
        }
    }
}

/// Error types for GameData operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot open database at {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Error during database {operation}: {source}")]
    Execution {
        operation: Operation,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the store itself could not be opened
    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    /// True when the engine rejected a statement or query
    pub fn is_execution(&self) -> bool {
        matches!(self, Error::Execution { .. })
    }
}
