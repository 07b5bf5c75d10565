//! Zone registry command handler.

use tabled::Tabled;
use thermo_core::{Thermostat, ZoneInfo};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Relay")]
    relay: String,
    #[tabled(rename = "Sensor")]
    sensor: String,
}

impl From<&ZoneInfo> for ZoneRow {
    fn from(z: &ZoneInfo) -> Self {
        Self {
            id: z.id.to_string(),
            name: z.name.clone(),
            relay: z.boiler_relay.clone().unwrap_or_default(),
            sensor: z.sensor_id.map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(thermostat: &Thermostat, global: &GlobalOpts) -> Result<(), CliError> {
    let zones = thermostat.list_zones().await?;
    let out = output::render_list(&global.output, &zones, |z| ZoneRow::from(z), |z| z.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
