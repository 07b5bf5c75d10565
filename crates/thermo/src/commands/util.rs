//! Shared rendering helpers for command handlers.

use chrono::{Datelike, Local, NaiveDateTime};
use tabled::Tabled;

use thermo_core::{DaySchedule, OverrideState, ScheduleEntry, TimeOfDay, Weekday};

use crate::output;

/// Today's weekday and wall-clock minute on this machine.
pub fn local_now() -> (Weekday, TimeOfDay) {
    let now = Local::now();
    (
        Weekday::from_chrono(now.weekday()),
        TimeOfDay::from_naive(now.time()),
    )
}

pub fn format_until(until: &NaiveDateTime) -> String {
    until.format("%a %H:%M").to_string()
}

pub fn format_override(state: OverrideState) -> String {
    state
        .until()
        .map_or_else(|| "-".into(), |until| format!("until {}", format_until(&until)))
}

pub fn format_temp(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |t| format!("{t:.1}"))
}

/// `1=20.0 2=19.0` for a row's zone targets.
pub fn format_targets(entry: &ScheduleEntry) -> String {
    entry
        .zones()
        .filter_map(|zone| entry.zone_temp(zone).map(|t| format!("{zone}={t}")))
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Schedule rows ───────────────────────────────────────────────────

#[derive(Tabled)]
pub struct EntryRow {
    #[tabled(rename = "")]
    active: String,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Targets")]
    targets: String,
}

/// One row per entry; the last entry of a day runs until tomorrow.
pub fn entry_rows(day: &DaySchedule, active: Option<usize>, color: bool) -> Vec<EntryRow> {
    day.iter()
        .enumerate()
        .map(|(index, entry)| EntryRow {
            active: output::active_marker(active == Some(index), color),
            start: entry.when.to_string(),
            end: day
                .end_of(index)
                .map_or_else(|| "tomorrow".into(), ToString::to_string),
            targets: format_targets(entry),
        })
        .collect()
}

pub fn render_day(day: &DaySchedule, active: Option<usize>, color: bool) -> String {
    if day.is_empty() {
        return "No entries.".into();
    }
    output::render_table(&entry_rows(day, active, color))
}
