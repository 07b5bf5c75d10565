//! Clap derive structures for the `thermo` CLI.
//!
//! Defines the command tree, global flags, and the small value parsers
//! for days, times and zone temperatures.

use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use thermo_core::{Temperature, TimeOfDay, Weekday, ZoneId};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// thermo -- view and edit a BoilerIO heating schedule
#[derive(Debug, Parser)]
#[command(
    name = "thermo",
    version,
    about = "View and edit a multi-zone heating schedule from the command line",
    long_about = "Talks to a BoilerIO scheduler web server: shows current zone\n\
        temperatures, edits the recurring weekly schedule, and applies\n\
        temporary target overrides.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "THERMO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Scheduler server URL (overrides profile)
    #[arg(long, short = 's', env = "THERMO_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "THERMO_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "THERMO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "THERMO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current temperatures, targets, overrides and today's schedule
    #[command(alias = "st")]
    Summary,

    /// View and edit the weekly schedule
    #[command(alias = "sched")]
    Schedule(ScheduleArgs),

    /// Set or clear temporary target overrides
    #[command(alias = "ov")]
    Override(OverrideArgs),

    /// List configured zones
    Zones,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Schedule ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    pub command: ScheduleCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Show one day of the schedule (today by default)
    #[command(alias = "ls")]
    Show {
        /// Day of week: name, short name, or 0-6 from Monday
        #[arg(long, short = 'd', value_parser = parse_day)]
        day: Option<Weekday>,
    },

    /// Add an entry; every zone given with --set is sent separately
    Add {
        /// Day of week: name, short name, or 0-6 from Monday
        #[arg(long, short = 'd', value_parser = parse_day)]
        day: Weekday,

        /// Start time, HH:MM (24-hour)
        #[arg(long, short = 't')]
        time: TimeOfDay,

        /// Zone target as ZONE=TEMP (repeatable)
        #[arg(long = "set", value_name = "ZONE=TEMP", required = true)]
        targets: Vec<ZoneTarget>,
    },

    /// Remove an entry, or one zone's part of it
    #[command(alias = "rm")]
    Remove {
        /// Day of week: name, short name, or 0-6 from Monday
        #[arg(long, short = 'd', value_parser = parse_day)]
        day: Weekday,

        /// Start time of the entry, HH:MM
        #[arg(long, short = 't')]
        time: TimeOfDay,

        /// Only remove this zone's target
        #[arg(long, short = 'z')]
        zone: Option<ZoneId>,
    },
}

// ── Override ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OverrideArgs {
    #[command(subcommand)]
    pub command: OverrideCommand,
}

#[derive(Debug, Subcommand)]
pub enum OverrideCommand {
    /// Hold a zone at a temperature for a number of hours
    Set {
        /// Zone to override
        #[arg(long, short = 'z')]
        zone: ZoneId,

        /// Target temperature in °C
        #[arg(long, short = 't')]
        temp: Temperature,

        /// How long the override lasts
        #[arg(long, default_value = "1")]
        hours: u32,
    },

    /// Return to the schedule (every zone unless --zone is given)
    Clear {
        /// Only clear this zone
        #[arg(long, short = 'z')]
        zone: Option<ZoneId>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a profile for --server (and --insecure) to the config file
    Init {
        /// Profile name
        #[arg(long, default_value = "default")]
        name: String,

        /// Replace an existing profile of the same name
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

/// A `ZONE=TEMP` pair from `schedule add --set`.
#[derive(Debug, Clone, Copy)]
pub struct ZoneTarget {
    pub zone: ZoneId,
    pub temp: Temperature,
}

impl FromStr for ZoneTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (zone, temp) = s
            .split_once('=')
            .ok_or_else(|| format!("expected ZONE=TEMP, got '{s}'"))?;
        Ok(Self {
            zone: zone.parse().map_err(|e| format!("{e}"))?,
            temp: temp.parse().map_err(|e| format!("{e}"))?,
        })
    }
}

fn parse_day(s: &str) -> Result<Weekday, String> {
    if let Ok(index) = s.parse::<u8>() {
        return Weekday::try_from(index).map_err(|e| e.to_string());
    }
    s.parse::<Weekday>()
        .map_err(|_| format!("unknown day '{s}' (use a name like 'mon' or 0-6 from Monday)"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zone_target_parses_pairs() {
        let target: ZoneTarget = "2=19.5".parse().unwrap();
        assert_eq!(target.zone, ZoneId(2));
        assert_eq!(target.temp.to_string(), "19.5");
        assert!("2:19.5".parse::<ZoneTarget>().is_err());
        assert!("2=99".parse::<ZoneTarget>().is_err());
    }

    #[test]
    fn day_accepts_names_and_indices() {
        assert_eq!(parse_day("3").unwrap(), Weekday::Thursday);
        assert_eq!(parse_day("sat").unwrap(), Weekday::Saturday);
        assert!(parse_day("7").is_err());
        assert!(parse_day("someday").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
