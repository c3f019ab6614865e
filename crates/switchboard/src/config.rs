//! CLI configuration: thin wrapper around `switchboard_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --username, --insecure, ...).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use switchboard_config::{Config, Defaults};
use switchboard_core::{ClientConfig, Credentials, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Config file path: `--config` / `SWITCHBOARD_CONFIG`, else the platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(switchboard_config::config_path)
}

/// Load the config file merged with the environment. A missing file
/// yields defaults.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(switchboard_config::load_config_from(&config_path(global))?)
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
/// Flags take priority over profile values.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut client = if let Some(profile) = cfg.profiles.get(&profile_name) {
        switchboard_config::profile_to_client_config(profile, &profile_name, &cfg.defaults)?
    } else if let Some(url) = global.url.as_deref() {
        flag_only_config(url, &cfg.defaults)?
    } else if global.profile.is_some() {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available.join(", "),
        });
    } else {
        return Err(CliError::NoConfig {
            path: config_path(global).display().to_string(),
        });
    };

    if let Some(url) = global.url.as_deref() {
        client.url = parse_url(url)?;
    }
    if let Some(username) = &global.username {
        let password = global
            .password
            .clone()
            .ok_or_else(|| CliError::NoCredentials {
                profile: profile_name.clone(),
            })?;
        client.credentials = Some(Credentials {
            username: username.clone(),
            password: SecretString::from(password),
        });
    } else if let (Some(creds), Some(password)) = (client.credentials.as_mut(), &global.password) {
        creds.password = SecretString::from(password.clone());
    }
    if global.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.timeout = Duration::from_secs(secs);
    }

    Ok(client)
}

fn flag_only_config(url: &str, defaults: &Defaults) -> Result<ClientConfig, CliError> {
    Ok(ClientConfig {
        url: parse_url(url)?,
        credentials: None,
        tls: if defaults.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        },
        timeout: Duration::from_secs(defaults.timeout),
    })
}

fn parse_url(url: &str) -> Result<url::Url, CliError> {
    url.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {url}"),
    })
}
