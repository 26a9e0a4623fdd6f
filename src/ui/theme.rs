use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for the handful of things the CLI prints
#[derive(Debug, Clone)]
pub struct Theme {
    /// Banner and result-set titles
    pub title: Style,
    pub ok: Style,
    pub failure: Style,
    /// Labels, row counts
    pub label: Style,
    /// SQL NULL cells
    pub null: Style,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        if !color {
            return Self {
                title: Style::new(),
                ok: Style::new(),
                failure: Style::new(),
                label: Style::new(),
                null: Style::new(),
            };
        }

        Self {
            title: Style::new().cyan().bold(),
            ok: Style::new().green().bold(),
            failure: Style::new().red().bold(),
            label: Style::new().white().dimmed(),
            null: Style::new().bright_black().italic(),
        }
    }

    /// Color only on a terminal, and never with `NO_COLOR` set
    pub fn detect() -> Self {
        Self::new(std::env::var_os("NO_COLOR").is_none() && console::Term::stdout().is_term())
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
