use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn banner(text: &str) {
    println!("{} {}", Icons::DATABASE, text.style(theme().title.clone()));
}

pub fn done(message: &str) {
    println!("{} {}", Icons::CHECK, message.style(theme().ok.clone()));
}

/// Data-layer failures go to stderr
pub fn failure(err: &crate::Error) {
    eprintln!("{} {}", Icons::CROSS, err.to_string().style(theme().failure.clone()));
}

pub fn setting(label: &str, value: &str) {
    println!("  {} {}", format!("{}:", label).style(theme().label.clone()), value);
}

/// Title line printed above each result set
pub fn result_set_title(name: &str, rows: usize) {
    println!();
    println!(
        "{} {} {}",
        Icons::TABLE,
        name.style(theme().title.clone()),
        format!("({} rows)", rows).style(theme().label.clone())
    );
}
