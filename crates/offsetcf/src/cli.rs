//! Clap derive structures for the `offsetcf` CLI.
//!
//! Only depends on clap + clap_complete so `build.rs` can include it
//! directly for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// offsetcf -- merchant console for the OffsetCF carbon-offset widget
#[derive(Debug, Parser)]
#[command(
    name = "offsetcf",
    version,
    about = "Manage OffsetCF merchants, stores, and opt-in reports",
    long_about = "Register merchants, configure the storefront offset widget per store,\n\
        and view or export monthly opt-in summaries.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "OFFSETCF_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "OFFSETCF_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "OFFSETCF_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "OFFSETCF_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register and manage merchant accounts
    #[command(alias = "m")]
    Merchants(MerchantsArgs),

    /// Manage stores and their widget configuration
    #[command(alias = "s")]
    Stores(StoresArgs),

    /// View and export monthly opt-in summaries
    #[command(alias = "report")]
    OptIns(OptInsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Merchants ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MerchantsArgs {
    #[command(subcommand)]
    pub command: MerchantsCommand,
}

#[derive(Debug, Subcommand)]
pub enum MerchantsCommand {
    /// Register a new merchant account
    Register {
        /// Contact name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: String,

        /// Company name
        #[arg(long)]
        company: String,

        /// Company website (http or https)
        #[arg(long)]
        website: Option<String>,
    },

    /// Show a merchant (defaults to the profile's merchant)
    Get {
        /// Merchant ID
        id: Option<String>,
    },

    /// Update merchant details
    Update {
        /// Merchant ID (defaults to the profile's merchant)
        id: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        website: Option<String>,
    },
}

// ── Stores ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StoresArgs {
    /// Owning merchant (defaults to the profile's merchant_id)
    #[arg(long, short = 'm', env = "OFFSETCF_MERCHANT_ID", global = true)]
    pub merchant: Option<String>,

    #[command(subcommand)]
    pub command: StoresCommand,
}

#[derive(Debug, Subcommand)]
pub enum StoresCommand {
    /// List the merchant's stores
    #[command(alias = "ls")]
    List,

    /// Add a store with a widget configuration
    Create {
        /// Store name
        #[arg(long)]
        name: String,

        /// Storefront domain (e.g. mystore.myshopify.com)
        #[arg(long)]
        domain: String,

        #[command(flatten)]
        widget: WidgetArgs,
    },

    /// Update a store's name, domain, or widget
    Update {
        /// Store ID
        store_id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        domain: Option<String>,

        #[command(flatten)]
        widget: WidgetArgs,
    },

    /// Delete a store
    #[command(alias = "rm")]
    Delete {
        /// Store ID
        store_id: String,
    },

    /// Show the widget on the storefront
    Enable {
        /// Store ID
        store_id: String,
    },

    /// Hide the widget on the storefront
    Disable {
        /// Store ID
        store_id: String,
    },
}

/// Widget appearance flags shared by create and update.
#[derive(Debug, Args)]
pub struct WidgetArgs {
    /// Corner the widget is anchored to
    #[arg(long)]
    pub position: Option<PositionArg>,

    /// Colour scheme
    #[arg(long)]
    pub theme: Option<ThemeArg>,

    /// Primary colour as #RRGGBB
    #[arg(long)]
    pub primary_color: Option<String>,

    /// Text colour as #RRGGBB
    #[arg(long)]
    pub text_color: Option<String>,

    /// Message shown in the widget (empty clears it)
    #[arg(long)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PositionArg {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Auto,
}

// ── Opt-ins ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OptInsArgs {
    #[command(subcommand)]
    pub command: OptInsCommand,
}

/// Store and month selection shared by the opt-in commands.
#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Store ID (defaults to the profile's store_id)
    #[arg(long, short = 's', env = "OFFSETCF_STORE_ID")]
    pub store: Option<String>,

    /// Month as YYYY-MM (defaults to the current month)
    #[arg(long, short = 'M', conflicts_with = "all_time")]
    pub month: Option<String>,

    /// Do not send a month; export covers all time
    #[arg(long)]
    pub all_time: bool,
}

#[derive(Debug, Subcommand)]
pub enum OptInsCommand {
    /// Show totals for one store and month
    Summary {
        #[command(flatten)]
        report: ReportArgs,

        /// Include the per-day breakdown
        #[arg(long, short = 'd')]
        daily: bool,
    },

    /// Download the CSV for the same store and month
    Export {
        #[command(flatten)]
        report: ReportArgs,

        /// Directory to write opt-ins-{month}.csv into
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Check that the CSV totals match the summary
        #[arg(long)]
        verify: bool,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// One of: api_url, merchant_id, store_id, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
