//! Clap derive structures for the `gwnly` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Also
//! compiled by `build.rs` for man page generation, so it may only depend on
//! clap and clap_complete.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gwnly -- inspect Grandstream GWN networks from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "gwnly",
    version,
    about = "Inspect Grandstream GWN access points and clients",
    long_about = "Query the Grandstream GWN cloud (or a self-hosted GWN Manager) through\n\
        its signed open API: list networks, access points and connected clients,\n\
        evaluate per-device sensors, or watch the network on a fixed interval.",
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
    #[arg(long, short = 'p', env = "GWN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL, e.g. https://eu.gwn.cloud (overrides profile)
    #[arg(long, short = 's', env = "GWN_SERVER", global = true)]
    pub server: Option<String>,

    /// Open API application id (overrides profile)
    #[arg(long, env = "GWN_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// Open API application secret (overrides profile)
    #[arg(long, env = "GWN_APP_SECRET", global = true, hide_env_values = true)]
    pub app_secret: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GWN_OUTPUT",
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

    /// Accept self-signed TLS certificates (self-hosted GWN Manager)
    #[arg(long, short = 'k', env = "GWN_INSECURE", global = true)]
    pub insecure: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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
    /// Authenticate against the open API and report the token lifetime
    Auth,

    /// List networks on the account
    #[command(alias = "net", alias = "n")]
    Networks,

    /// List access points
    #[command(alias = "ap")]
    Aps(ApsArgs),

    /// List connected clients, joined with their access point
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Fetch one full snapshot (access points and clients)
    Snapshot(ScopeArgs),

    /// Evaluate the per-device sensor table
    Sensors(SensorsArgs),

    /// Poll on a fixed interval and print a summary per cycle
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Network scoping shared by the listing commands.
#[derive(Debug, Args)]
pub struct ScopeArgs {
    /// Network id to query (default: first network on the account)
    #[arg(long, short = 'n')]
    pub network: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVENTORY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApsArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Show only online access points
    #[arg(long)]
    pub online: bool,
}

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Show only clients associated with this AP (MAC)
    #[arg(long)]
    pub ap: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SENSORS / WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SensorsArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Only sensors of this access point (MAC)
    #[arg(long, conflicts_with = "client")]
    pub ap: Option<String>,

    /// Only sensors of this client (MAC)
    #[arg(long)]
    pub client: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between cycles (default: config `poll_interval`, else 10)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create or update a profile with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the app secret for a profile in the system keyring
    SetSecret,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
