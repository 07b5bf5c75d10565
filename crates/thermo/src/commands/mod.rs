//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod overrides;
pub mod schedule;
pub mod summary;
pub mod util;
pub mod zones;

use thermo_core::Thermostat;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    thermostat: &Thermostat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Summary => summary::handle(thermostat, global).await,
        Command::Schedule(args) => schedule::handle(thermostat, args, global).await,
        Command::Override(args) => overrides::handle(thermostat, args, global).await,
        Command::Zones => zones::handle(thermostat, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
