//! Shared helpers for command handlers.

use std::io::IsTerminal;

use crate::config::Profile;
use crate::error::CliError;

/// Merchant from the flag/positional, else the profile.
pub fn merchant_id(explicit: Option<String>, profile: &Profile) -> Result<String, CliError> {
    explicit
        .or_else(|| profile.merchant_id.clone())
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| CliError::MissingArgument {
            what: "merchant ID".into(),
            hint: "Pass --merchant <id>, or save one with: offsetcf config set merchant_id <id>"
                .into(),
        })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.to_owned(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
