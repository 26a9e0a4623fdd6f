//! Query Layer
//!
//! Runs statements and queries through scoped connections and turns every
//! result set into rows of tagged values.

pub mod executor;
pub mod source;

pub use executor::QueryExecutor;
pub use source::UNNAMED_RESULT;
