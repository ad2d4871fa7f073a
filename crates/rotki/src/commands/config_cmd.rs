//! Config subcommand handlers. None of these talk to the backend.

use rotki_config::{self as config, Config, Profile, DEFAULT_PROFILE};
use rotki_core::config::DEFAULT_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(
                &global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_default(),
                |c| c.profiles.keys().cloned().collect::<Vec<_>>().join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let profile_name = global
                .profile
                .clone()
                .unwrap_or_else(|| DEFAULT_PROFILE.to_owned());
            let url = global.url.clone().unwrap_or_else(|| DEFAULT_URL.to_owned());
            url.parse::<url::Url>().map_err(|_| CliError::Validation {
                field: "url".into(),
                reason: format!("invalid URL: {url}"),
            })?;

            let profile = Profile {
                url,
                premium: global.premium,
                modules: global.modules.iter().map(ToString::to_string).collect(),
                timeout: global.timeout,
                ..Profile::default()
            };

            let mut cfg = Config {
                default_profile: Some(profile_name.clone()),
                ..Config::default()
            };
            cfg.profiles.clear();
            cfg.profiles.insert(profile_name.clone(), profile);

            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Wrote profile '{profile_name}' to {}", written.display());
            }
            Ok(())
        }
    }
}
