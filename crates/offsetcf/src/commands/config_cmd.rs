//! Config subcommand handlers.

use std::collections::HashMap;

use dialoguer::Input;

use offsetcf_core::DEFAULT_API_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output;

const KEYS: &str = "api_url, merchant_id, store_id, timeout";

// ── Helpers ─────────────────────────────────────────────────────────

/// TOML-shaped view of the config, profiles in name order.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref url) = p.api_url {
            let _ = writeln!(out, "api_url = \"{url}\"");
        }
        if let Some(ref id) = p.merchant_id {
            let _ = writeln!(out, "merchant_id = \"{id}\"");
        }
        if let Some(ref id) = p.store_id {
            let _ = writeln!(out, "store_id = \"{id}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_owned()
}

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Optional text prompt; an empty answer means unset.
fn prompt_optional(prompt: &str) -> Result<Option<String>, CliError> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_owned()))
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            config::parse_api_url(&value)?;
            profile.api_url = Some(value);
        }
        "merchant_id" | "merchant-id" => profile.merchant_id = Some(value),
        "store_id" | "store-id" => profile.store_id = Some(value),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("OffsetCF console setup");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("API URL")
                .default(DEFAULT_API_URL.into())
                .validate_with(|input: &String| {
                    config::parse_api_url(input)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let merchant_id = prompt_optional("Merchant ID (blank to skip)")?;
            let store_id = prompt_optional("Default store ID (blank to skip)")?;

            let profile = Profile {
                api_url: (api_url != DEFAULT_API_URL).then_some(api_url),
                merchant_id,
                store_id,
                timeout: None,
            };

            let mut profiles = HashMap::new();
            profiles.insert(profile_name.clone(), profile);

            let cfg = Config {
                default_profile: Some(profile_name.clone()),
                defaults: Defaults::default(),
                profiles,
            };

            let written = config::save_config(&cfg)?;

            output::success(
                &format!("Configuration written to {}", written.display()),
                global.quiet,
            );
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Try it: offsetcf opt-ins summary");
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                config::config_path().display().to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();

            set_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::success(&format!("Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: offsetcf config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                let lines: Vec<String> = names
                    .into_iter()
                    .map(|name| {
                        let marker = if name == default { " *" } else { "" };
                        format!("{name}{marker}")
                    })
                    .collect();
                output::print_output(&lines.join("\n"), global.quiet);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(name, &cfg));
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_known_keys() {
        let mut p = Profile::default();
        set_key(&mut p, "merchant_id", "m-1".into()).unwrap();
        set_key(&mut p, "store-id", "s-1".into()).unwrap();
        set_key(&mut p, "timeout", "12".into()).unwrap();
        set_key(&mut p, "api_url", "http://localhost:4000".into()).unwrap();
        assert_eq!(p.merchant_id.as_deref(), Some("m-1"));
        assert_eq!(p.store_id.as_deref(), Some("s-1"));
        assert_eq!(p.timeout, Some(12));
        assert_eq!(p.api_url.as_deref(), Some("http://localhost:4000"));
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut p = Profile::default();
        assert!(set_key(&mut p, "timeout", "soon".into()).is_err());
        assert!(set_key(&mut p, "api_url", "ftp://example.com".into()).is_err());
        let err = set_key(&mut p, "colour", "red".into()).unwrap_err();
        assert!(err.to_string().contains("colour"));
        assert_eq!(p, Profile::default());
    }

    #[test]
    fn show_lists_profiles_in_order() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                api_url: Some("https://staging.offsetcf.com".into()),
                ..Profile::default()
            },
        );
        cfg.profiles.insert(
            "default".into(),
            Profile {
                store_id: Some("s-1".into()),
                ..Profile::default()
            },
        );
        let text = format_config(&cfg);
        let default_at = text.find("[profiles.default]").unwrap();
        let staging_at = text.find("[profiles.staging]").unwrap();
        assert!(default_at < staging_at);
        assert!(text.contains("store_id = \"s-1\""));
        assert!(text.contains("timeout = 30"));
    }
}
