//! `switchboard-tui`: terminal browser for the switch inventory.
//!
//! Lists every switch with its flow count and bandwidth sum, supports
//! global and per-column search, paging, clipboard export, and a detail
//! view per switch.
//!
//! Logs are written to a file (default `/tmp/switchboard-tui.log`) to avoid
//! corrupting the terminal UI.

mod action;
mod app;
mod clipboard;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod session;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use switchboard_config::{Config, Preferences};
use switchboard_core::{ClientConfig, Credentials, SwitchService, TlsVerification};

use crate::app::App;

/// Terminal browser for switches and their flow load.
#[derive(Parser, Debug)]
#[command(name = "switchboard-tui", version, about)]
struct Cli {
    /// Profile from the config file
    #[arg(short = 'p', long, env = "SWITCHBOARD_PROFILE")]
    profile: Option<String>,

    /// Northbound API URL (overrides the profile)
    #[arg(short = 'u', long, env = "SWITCHBOARD_URL")]
    url: Option<String>,

    /// Username for basic auth
    #[arg(long, env = "SWITCHBOARD_USERNAME")]
    username: Option<String>,

    /// Password for basic auth
    #[arg(long, env = "SWITCHBOARD_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(short = 'k', long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Search flag handed to the switch detail view
    #[arg(long)]
    filter: Option<String>,

    /// Initial global search term
    #[arg(short = 's', long)]
    search: Option<String>,

    /// Config file path
    #[arg(long, env = "SWITCHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long, default_value = "/tmp/switchboard-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Logging to stdout/stderr would corrupt the TUI.
/// The returned guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "switchboard_tui={log_level},switchboard_core={log_level},switchboard_api={log_level}"
        ))
    });

    let log_dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("switchboard-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve connection settings. Priority: flags > profile > defaults.
fn build_client_config(cli: &Cli, cfg: &Config) -> Result<ClientConfig> {
    let profile_name = cli
        .profile
        .clone()
        .unwrap_or_else(|| cfg.active_profile_name().to_owned());

    let mut client = match (cfg.profile(&profile_name), cli.url.as_deref()) {
        (Ok(profile), url) => {
            let mut client =
                switchboard_config::profile_to_client_config(profile, &profile_name, &cfg.defaults)?;
            if let Some(url) = url {
                client.url = parse_url(url)?;
            }
            client
        }
        (Err(_), Some(url)) => ClientConfig {
            url: parse_url(url)?,
            credentials: None,
            tls: if cfg.defaults.insecure {
                TlsVerification::DangerAcceptInvalid
            } else {
                TlsVerification::SystemDefaults
            },
            timeout: Duration::from_secs(cfg.defaults.timeout),
        },
        (Err(e), None) => {
            return Err(eyre!(e)).wrap_err("pass --url or run `switchboard config init`");
        }
    };

    if let Some(username) = &cli.username {
        let password = cli.password.clone().unwrap_or_default();
        client.credentials = Some(Credentials {
            username: username.clone(),
            password: SecretString::from(password),
        });
    }
    if cli.insecure {
        client.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = cli.timeout {
        client.timeout = Duration::from_secs(secs);
    }
    Ok(client)
}

fn parse_url(url: &str) -> Result<url::Url> {
    url.parse().wrap_err_with(|| format!("invalid URL: {url}"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(switchboard_config::config_path);
    let cfg = if config_path.exists() {
        switchboard_config::load_config_from(&config_path)?
    } else {
        Config::default()
    };

    let client_config = build_client_config(&cli, &cfg)?;
    info!(url = %client_config.url, "starting switchboard-tui");

    let service = SwitchService::new(&client_config)?;
    let preferences = Preferences::load(&switchboard_config::preferences_path(&config_path))
        .unwrap_or_default();
    let filter_flag = cli.filter.clone().unwrap_or_else(|| cfg.defaults.filter.clone());

    let mut app = App::new(service, Box::new(preferences), filter_flag, cli.search.clone());
    app.run().await?;

    Ok(())
}
