mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rotki_config as config;
use rotki_core::{Session, SessionConfig};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "rotki-sync", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let session_config = build_session_config(&cli.global)?;
            let session = Session::new(session_config)?;

            tracing::debug!(command = ?cmd, url = %session.config().url, "dispatching command");
            let result = commands::dispatch(cmd, &session, &cli.global).await;
            session.logout();
            result
        }
    }
}

/// Build a `SessionConfig` from the config file, profile, and CLI overrides.
fn build_session_config(global: &GlobalOpts) -> Result<SessionConfig, CliError> {
    let cfg = config::load_config()?;
    let (name, profile) = config::resolve_profile(&cfg, global.profile.as_deref())?;
    tracing::debug!(profile = name, "resolved profile");

    let mut session_config = config::profile_to_session_config(profile, &cfg.defaults)?;

    if let Some(ref url) = global.url {
        session_config.url = url.parse().map_err(|_| CliError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {url}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        session_config.timeout = Duration::from_secs(secs);
    }
    if global.premium {
        session_config.premium = true;
    }
    if !global.modules.is_empty() {
        session_config.modules.clone_from(&global.modules);
    }

    Ok(session_config)
}
