mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, FromArgMatches};
use tracing_subscriber::EnvFilter;

use offsetcf_core::Console;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let matches = Cli::command().get_matches();
    let mut cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    init_tracing(cli.global.verbose);
    let cfg = config::load_config_or_default();
    config::apply_defaults(&mut cli.global, &matches, &cfg.defaults);
    output::init_color(&cli.global.color);

    if let Err(err) = run(cli, &cfg).await {
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

async fn run(cli: Cli, cfg: &Config) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "offsetcf", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let profile = config::active_profile(&cli.global, cfg)?;
            let console_config = config::resolve_console_config(&cli.global, cfg)?;
            tracing::debug!(api_url = %console_config.api_url, "using API");
            let console = Console::new(console_config)?;

            commands::dispatch(cmd, &console, &profile, &cli.global).await
        }
    }
}
