//! Clap derive structures for the `routerclients` CLI.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// routerclients -- who is on your home network, right now
#[derive(Debug, Parser)]
#[command(
    name = "routerclients",
    version,
    about = "Snapshot the clients attached to a home router",
    long_about = "Queries a home router over SSH or its web management API and lists\n\
        every attached client, grouped by interface (2.4 GHz, 5 GHz, guest\n\
        networks, wired), flagging devices seen for the first time recently.",
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
    /// Router profile to use
    #[arg(long, short = 'p', env = "ROUTERCLIENTS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Router address (overrides profile)
    #[arg(long, env = "ROUTERCLIENTS_HOST", global = true)]
    pub host: Option<String>,

    /// Transport: ssh, http or https (overrides profile)
    #[arg(long, short = 't', env = "ROUTERCLIENTS_TRANSPORT", global = true)]
    pub transport: Option<String>,

    /// Port (overrides profile)
    #[arg(long, env = "ROUTERCLIENTS_PORT", global = true)]
    pub port: Option<u16>,

    /// Login name (overrides profile)
    #[arg(long, short = 'u', env = "ROUTERCLIENTS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password (overrides profile and keyring)
    #[arg(long, env = "ROUTERCLIENTS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', env = "ROUTERCLIENTS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ROUTERCLIENTS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ROUTERCLIENTS_TIMEOUT", global = true)]
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
    /// Plain text, one MAC per line (scripting)
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
    /// Take one snapshot of the router's clients
    #[command(alias = "f")]
    Fetch(FetchArgs),

    /// Take a snapshot periodically until interrupted
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Fetch / Watch ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StoreArgs {
    /// Flush the first-seen store after every snapshot
    #[arg(long)]
    pub persist: bool,

    /// First-seen store file (overrides profile)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// How long a device counts as new, e.g. "1h" or "2days"
    #[arg(long, value_name = "DURATION", value_parser = humantime::parse_duration)]
    pub recency_window: Option<Duration>,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Only list clients flagged as new
    #[arg(long)]
    pub new_only: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Time between snapshots, e.g. "30s" or "5m" (defaults to config)
    #[arg(long, short = 'i', value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display current configuration (secrets masked)
    Show,

    /// List configured profiles
    Profiles,

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
