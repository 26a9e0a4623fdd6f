//! Terminal rendering for the CLI

pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, done, failure, result_set_title, setting};
pub use table::{render_result_table, stats_table};
pub use theme::{theme, Theme};
