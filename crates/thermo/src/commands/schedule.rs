//! Schedule command handlers.
//!
//! Each invocation opens one editing session, applies a single edit, and
//! closes the session again.

use serde::Serialize;
use thermo_core::{AddOutcome, ScheduleEntry, Temperature, Thermostat, TimeOfDay, Weekday, ZoneId};

use crate::cli::{GlobalOpts, ScheduleArgs, ScheduleCommand, ZoneTarget};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

/// Serializable view of an add, including the zones the server refused.
#[derive(Serialize)]
struct AddReport {
    day: Weekday,
    index: usize,
    entry: ScheduleEntry,
    confirmed: Vec<ZoneId>,
    failed: Vec<FailedZone>,
}

#[derive(Serialize)]
struct FailedZone {
    zone: ZoneId,
    error: String,
}

impl From<&AddOutcome> for AddReport {
    fn from(outcome: &AddOutcome) -> Self {
        Self {
            day: outcome.day,
            index: outcome.index,
            entry: outcome.entry.clone(),
            confirmed: outcome.confirmed.clone(),
            failed: outcome
                .failed
                .iter()
                .map(|(zone, e)| FailedZone {
                    zone: *zone,
                    error: e.to_string(),
                })
                .collect(),
        }
    }
}

pub async fn handle(
    thermostat: &Thermostat,
    args: ScheduleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let editor = thermostat.edit_schedule().await?;
    let result = match args.command {
        ScheduleCommand::Show { day } => {
            let (today, now) = util::local_now();
            let day = day.unwrap_or(today);
            let schedule = editor.day(day);
            let active = (day == today)
                .then(|| schedule.active_index(&now))
                .flatten();
            let color = output::should_color(&global.color);

            let out = output::render_single(
                &global.output,
                &schedule,
                |s| format!("{day}\n{}", util::render_day(s, active, color)),
                |s| {
                    s.iter()
                        .map(|e| format!("{}\t{}", e.when, util::format_targets(e)))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ScheduleCommand::Add { day, time, targets } => {
            let temps = targets
                .iter()
                .map(|ZoneTarget { zone, temp }| (*zone, Some(*temp)));
            let outcome = editor.add_entry(day, &time, temps).await?;
            let report = AddReport::from(&outcome);

            let out = output::render_single(
                &global.output,
                &report,
                |r| {
                    format!(
                        "Added {} on {} for zones {}",
                        r.entry.when,
                        r.day,
                        join_zones(r.confirmed.iter())
                    )
                },
                |r| r.entry.when.to_string(),
            )?;
            output::print_output(&out, global.quiet);

            if outcome.is_partial() {
                return Err(CliError::PartialSave {
                    when: time.to_string(),
                    zones: join_zones(outcome.failed.iter().map(|(z, _)| z)),
                });
            }
            Ok(())
        }

        ScheduleCommand::Remove { day, time, zone } => match zone {
            Some(zone) => {
                let temp = editor.remove_zone_entry(day, &time, zone).await?;
                print_removed(global, day, &time, Some((zone, temp)))
            }
            None => {
                editor.remove_entry(day, &time).await?;
                print_removed(global, day, &time, None)
            }
        },
    };
    editor.close();
    result
}

fn print_removed(
    global: &GlobalOpts,
    day: Weekday,
    time: &TimeOfDay,
    zone: Option<(ZoneId, Temperature)>,
) -> Result<(), CliError> {
    #[derive(Serialize)]
    struct Removed<'a> {
        day: Weekday,
        when: &'a TimeOfDay,
        zone: Option<ZoneId>,
        temp: Option<Temperature>,
    }

    let removed = Removed {
        day,
        when: time,
        zone: zone.map(|(z, _)| z),
        temp: zone.map(|(_, t)| t),
    };
    let out = output::render_single(
        &global.output,
        &removed,
        |r| match (r.zone, r.temp) {
            (Some(z), Some(t)) => format!("Removed zone {z} ({t}) from {} on {}", r.when, r.day),
            _ => format!("Removed {} on {}", r.when, r.day),
        },
        |r| r.when.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn join_zones<'a>(zones: impl Iterator<Item = &'a ZoneId>) -> String {
    zones.map(ToString::to_string).collect::<Vec<_>>().join(",")
}
