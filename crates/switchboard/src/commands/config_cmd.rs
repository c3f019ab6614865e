//! Config subcommand handlers. None of these touch the network.

use std::fmt::Write as _;

use switchboard_config::{Config, Preferences, Profile};
use switchboard_core::{DISCREPANCY_VISIBLE_KEY, discrepancy_visible};
use tracing::info;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, Toggle};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config, preferences: &Preferences) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "filter = \"{}\"", cfg.defaults.filter);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let Some(p) = cfg.profiles.get(name) else {
            continue;
        };
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "url = \"{}\"", p.url);
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "# {}", preferences.path().display());
    let _ = write!(
        out,
        "{DISCREPANCY_VISIBLE_KEY} = {}",
        discrepancy_visible(preferences)
    );

    out
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        ConfigCommand::Init {
            url,
            name,
            username,
            password_env,
            insecure,
            force,
        } => {
            url::Url::parse(&url).map_err(|e| CliError::Validation {
                field: "url".into(),
                reason: format!("invalid URL '{url}': {e}"),
            })?;

            let mut cfg = config::load(global)?;
            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::ProfileExists { name });
            }

            cfg.profiles.insert(
                name.clone(),
                Profile {
                    url,
                    username,
                    password_env,
                    insecure: insecure.then_some(true),
                    ..Profile::default()
                },
            );
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }

            switchboard_config::save_config_to(&cfg, &path)?;
            info!(profile = %name, path = %path.display(), "profile saved");
            if !global.quiet {
                eprintln!("Profile '{name}' written to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let preferences = Preferences::load(&switchboard_config::preferences_path(&path))?;
            output::print_output(&format_config_redacted(&cfg, &preferences), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Discrepancy { state } => {
            let mut preferences =
                Preferences::load(&switchboard_config::preferences_path(&path))?;
            preferences.set_discrepancy_visible(state == Toggle::On);
            preferences.save()?;
            if !global.quiet {
                eprintln!(
                    "Discrepancy column {} (takes effect the next time the switch table opens)",
                    if state == Toggle::On { "shown" } else { "hidden" }
                );
            }
            Ok(())
        }
    }
}
