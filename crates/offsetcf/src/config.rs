//! CLI configuration: thin wrapper around `offsetcf_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--profile,
//! --api-url, --timeout, --output, --color).

use std::time::Duration;

use clap::ArgMatches;
use clap::ValueEnum;
use clap::parser::ValueSource;
use offsetcf_core::ConsoleConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use offsetcf_config::{
    Config, Defaults, Profile, config_path, console_config_with, load_config_or_default,
    parse_api_url, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config
        .active_profile_name(global.profile.as_deref())
        .to_owned()
}

/// The active profile. An explicitly requested profile must exist; the
/// implicit default may be absent, in which case an empty one is used.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<Profile, CliError> {
    let name = active_profile_name(global, config);
    match config.profile(&name) {
        Some(profile) => Ok(profile.clone()),
        None if global.profile.is_some() => Err(profile_not_found(name, config)),
        None => Ok(Profile::default()),
    }
}

pub fn profile_not_found(name: String, config: &Config) -> CliError {
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

/// Build the `ConsoleConfig`: flags, then profile, then defaults.
///
/// `--api-url` also carries `OFFSETCF_API_URL` through clap's `env`.
pub fn resolve_console_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ConsoleConfig, CliError> {
    let profile = active_profile(global, config)?;
    let mut console = console_config_with(&profile, &config.defaults, global.api_url.as_deref())?;
    if let Some(secs) = global.timeout {
        console.timeout = Duration::from_secs(secs);
    }
    Ok(console)
}

/// Fill `--output` and `--color` from `[defaults]` when neither the flag
/// nor its env var was given.
pub fn apply_defaults(global: &mut GlobalOpts, matches: &ArgMatches, defaults: &Defaults) {
    if from_clap_default(matches, "output") {
        match <OutputFormat as ValueEnum>::from_str(&defaults.output, true) {
            Ok(format) => global.output = format,
            Err(_) => tracing::warn!(value = %defaults.output, "unknown default output format, ignoring"),
        }
    }
    if from_clap_default(matches, "color") {
        match <ColorMode as ValueEnum>::from_str(&defaults.color, true) {
            Ok(mode) => global.color = mode,
            Err(_) => tracing::warn!(value = %defaults.color, "unknown default color mode, ignoring"),
        }
    }
}

fn from_clap_default(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        None | Some(ValueSource::DefaultValue)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::{CommandFactory, FromArgMatches};

    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> (Cli, ArgMatches) {
        let matches = Cli::command().try_get_matches_from(args).unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        (cli, matches)
    }

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
            ..Defaults::default()
        }
    }

    #[test]
    fn config_defaults_fill_unset_flags() {
        let (mut cli, matches) = parse(&["offsetcf", "config", "show"]);
        apply_defaults(&mut cli.global, &matches, &defaults("json", "never"));
        assert!(matches!(cli.global.output, OutputFormat::Json));
        assert!(matches!(cli.global.color, ColorMode::Never));
    }

    #[test]
    fn explicit_flags_beat_config_defaults() {
        let (mut cli, matches) =
            parse(&["offsetcf", "config", "show", "-o", "yaml", "--color", "always"]);
        apply_defaults(&mut cli.global, &matches, &defaults("json", "never"));
        assert!(matches!(cli.global.output, OutputFormat::Yaml));
        assert!(matches!(cli.global.color, ColorMode::Always));
    }

    #[test]
    fn unknown_default_keeps_builtin() {
        let (mut cli, matches) = parse(&["offsetcf", "config", "show"]);
        apply_defaults(&mut cli.global, &matches, &defaults("xml", "sometimes"));
        assert!(matches!(cli.global.output, OutputFormat::Table));
        assert!(matches!(cli.global.color, ColorMode::Auto));
    }
}
