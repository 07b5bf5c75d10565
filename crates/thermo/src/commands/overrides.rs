//! Override command handlers.

use chrono::NaiveDateTime;
use serde::Serialize;
use thermo_core::{ClearScope, OverrideRequest, Temperature, Thermostat, ZoneId};

use crate::cli::{GlobalOpts, OverrideArgs, OverrideCommand};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct OverrideView {
    zone: Option<ZoneId>,
    temp: Option<Temperature>,
    until: Option<NaiveDateTime>,
}

pub async fn handle(
    thermostat: &Thermostat,
    args: OverrideArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OverrideCommand::Set { zone, temp, hours } => {
            let request = OverrideRequest::new(zone, temp, hours)?;
            let state = thermostat.set_override(request).await?;

            let view = OverrideView {
                zone: Some(zone),
                temp: Some(temp),
                until: state.until(),
            };
            let out = output::render_single(
                &global.output,
                &view,
                |_| format!("Zone {zone} held at {temp} ({})", util::format_override(state)),
                |v| v.until.map(|u| u.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OverrideCommand::Clear { zone } => {
            let scope = zone.map_or(ClearScope::All, ClearScope::Zone);
            thermostat.clear_override(scope).await?;

            let view = OverrideView {
                zone,
                temp: None,
                until: None,
            };
            let out = output::render_single(
                &global.output,
                &view,
                |v| match v.zone {
                    Some(z) => format!("Zone {z} back on schedule"),
                    None => "All zones back on schedule".into(),
                },
                |v| v.zone.map(|z| z.to_string()).unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
