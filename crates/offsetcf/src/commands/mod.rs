//! Command dispatch: bridges CLI args -> console operations -> output.

pub mod config_cmd;
pub mod merchants;
pub mod opt_ins;
pub mod stores;
pub mod util;

use offsetcf_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::config::Profile;
use crate::error::CliError;

/// Dispatch an API-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Merchants(args) => merchants::handle(console, args, profile, global).await,
        Command::Stores(args) => stores::handle(console, args, profile, global).await,
        Command::OptIns(args) => opt_ins::handle(console, args, profile, global).await,
        // Handled before a console is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
