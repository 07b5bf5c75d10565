//! Summary command handler: zones, overrides and today's schedule.

use std::fmt::Write as _;

use tabled::Tabled;
use thermo_core::{Summary, Thermostat, Zone};

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Zone")]
    name: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Override")]
    overridden: String,
}

fn zone_row(summary: &Summary, zone: &Zone, color: bool) -> ZoneRow {
    let state = summary.overrides.get(zone.id);
    let overridden = util::format_override(state);
    ZoneRow {
        id: zone.id.to_string(),
        name: zone.name.clone(),
        current: util::format_temp(zone.current_temp),
        target: util::format_temp(zone.target),
        overridden: if state.is_active() {
            output::override_label(&overridden, color)
        } else {
            overridden
        },
    }
}

fn detail(summary: &Summary, color: bool) -> String {
    let mut out = String::new();

    if summary.zones.is_empty() {
        // Single-zone servers only report top-level readings.
        let _ = writeln!(
            out,
            "Current: {}  Target: {}  Override: {}",
            util::format_temp(summary.current),
            util::format_temp(summary.target),
            util::format_override(summary.overrides.global()),
        );
    } else {
        let rows: Vec<ZoneRow> = summary
            .zones
            .iter()
            .map(|z| zone_row(summary, z, color))
            .collect();
        let _ = writeln!(out, "{}", output::render_table(&rows));
    }

    let _ = writeln!(out, "\nToday ({})", summary.server_day);
    out.push_str(&util::render_day(&summary.today, summary.active_entry, color));
    out
}

pub async fn handle(thermostat: &Thermostat, global: &GlobalOpts) -> Result<(), CliError> {
    thermostat.refresh_summary().await?;
    let summary = thermostat.summary();
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        summary.as_ref(),
        |s| detail(s, color),
        |s| {
            s.zones
                .iter()
                .map(|z| format!("{}\t{}", z.id, util::format_temp(z.current_temp)))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
