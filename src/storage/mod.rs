//! Storage Layer - SQLite access point
//!
//! - handle: database location, process-wide instance, scoped connections
//! - value: column values tagged with their storage class
//! - result: result-set name -> rows mapping produced by queries

pub mod handle;
pub mod result;
pub mod value;

pub use handle::{ScopedConnection, StoreHandle, StoreOptions};
pub use result::{QueryResultSet, ResultTable, Row};
pub use value::Value;
