use owo_colors::OwoColorize;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use crate::storage::{ResultTable, Value};
use crate::ui::theme;

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Setting")]
    label: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Two-column key/value table
pub fn stats_table(stats: &[(&str, String)]) -> String {
    if stats.is_empty() {
        return String::new();
    }

    let rows: Vec<StatRow> = stats
        .iter()
        .map(|(label, value)| StatRow {
            label: label.to_string(),
            value: value.clone(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "NULL".style(theme().null.clone()).to_string(),
        other => other.to_string(),
    }
}

/// Render one result set with its column names as the header row
pub fn render_result_table(table: &ResultTable) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().cloned());
    for row in &table.rows {
        builder.push_record(row.iter().map(cell));
    }

    let mut rendered = builder.build();
    rendered.with(Style::rounded());
    rendered.to_string()
}
