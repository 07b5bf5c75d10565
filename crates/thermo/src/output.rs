//! `--output` rendering for command results.
//!
//! Tables go through `tabled`, JSON through serde. Plain mode prints one
//! line per item for shell pipelines.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color ────────────────────────────────────────────────────────────

/// `--color auto` honours `NO_COLOR` and only colors a terminal.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Marker for the schedule row currently in force.
pub fn active_marker(active: bool, color: bool) -> String {
    match (active, color) {
        (false, _) => String::new(),
        (true, true) => "▶".green().bold().to_string(),
        (true, false) => "▶".into(),
    }
}

/// Highlight a zone that is held by an override.
pub fn override_label(label: &str, color: bool) -> String {
    if color {
        label.yellow().to_string()
    } else {
        label.to_owned()
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Render a slice of items.
///
/// Tables are built from `to_row`; JSON serializes `data` itself; plain
/// prints `id_fn` of each item.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render one item. In table mode `detail_fn` builds the whole text.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// Write to stdout unless `--quiet` or there is nothing to show.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}
