//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Profile};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: profile from --server / --insecure ────────────────
        ConfigCommand::Init { name, force } => {
            let server = global.server.clone().ok_or_else(|| CliError::Validation {
                field: "server".into(),
                reason: "pass --server <URL>".into(),
            })?;
            if server.parse::<url::Url>().is_err() {
                return Err(CliError::Validation {
                    field: "server".into(),
                    reason: format!("invalid URL: {server}"),
                });
            }

            let mut cfg = config::load_config_or_default();
            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::ProfileExists { name });
            }

            let mut profile = Profile::new(server);
            if global.insecure {
                profile.insecure = Some(true);
            }
            if let Some(timeout) = global.timeout {
                profile.timeout = Some(timeout);
            }
            cfg.profiles.insert(name.clone(), profile);
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }

            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Profile '{name}' written to {}", path.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let toml_str = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |_| toml_str.trim_end().to_owned(),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
