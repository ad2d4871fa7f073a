//! Clap derive structures for the `rotki-sync` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use rotki_core::{Blockchain, Module};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rotki-sync -- pull DeFi positions and detected tokens from a rotki backend
#[derive(Debug, Parser)]
#[command(
    name = "rotki-sync",
    version,
    about = "Sync DeFi and token data from a rotki backend",
    long_about = "Queries a running rotki backend for Liquity positions and\n\
        detected tokens. Expensive queries run as backend tasks that are\n\
        polled until they complete.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "ROTKI_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "ROTKI_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ROTKI_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Treat the account as premium
    #[arg(long, global = true)]
    pub premium: bool,

    /// Active module (repeatable); skips reading modules from the backend
    #[arg(long = "module", short = 'm', global = true)]
    pub modules: Vec<Module>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ROTKI_TIMEOUT", global = true)]
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
    /// Liquity troves, history, staking and stability pool
    #[command(alias = "lq")]
    Liquity(LiquityArgs),

    /// Detect and inspect ERC-20 tokens held by tracked accounts
    #[command(alias = "tok")]
    Tokens(TokensArgs),

    /// Inspect the backend task queue
    Tasks(TasksArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Liquity ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LiquityArgs {
    #[command(subcommand)]
    pub command: LiquityCommand,
}

#[derive(Debug, Subcommand)]
pub enum LiquityCommand {
    /// Trove collateral and debt per address
    Balances(RefreshArgs),

    /// Trove and stake history (premium)
    Events(RefreshArgs),

    /// LQTY staking positions (premium)
    Staking(RefreshArgs),

    /// Stability pool deposits
    Pools(RefreshArgs),
}

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Force a fetch even when data is already loaded
    #[arg(long, short = 'r')]
    pub refresh: bool,
}

// ── Tokens ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TokensArgs {
    #[command(subcommand)]
    pub command: TokensCommand,
}

#[derive(Debug, Subcommand)]
pub enum TokensCommand {
    /// Scan addresses for tokens
    Detect {
        /// Chain identifier (e.g. eth, optimism, base)
        #[arg(long, short = 'c')]
        chain: Blockchain,

        /// Address to scan (repeatable)
        #[arg(long, short = 'a', conflicts_with = "all")]
        address: Vec<String>,

        /// Scan every tracked address of the chain
        #[arg(long)]
        all: bool,
    },

    /// Show tokens found by the last detection run
    Show {
        /// Chain identifier (e.g. eth, optimism, base)
        #[arg(long, short = 'c')]
        chain: Blockchain,

        /// Only this address
        #[arg(long, short = 'a')]
        address: Option<String>,
    },
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List pending and completed task ids
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Print the config file location
    Path,

    /// Write a config file with a single profile
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
