//! Command-line interface definitions.
//!
//! Defines the CLI structure for nodefleet using `clap`: host provisioning,
//! wallet handling, fleet generation, the `manage` lifecycle wrapper and
//! diagnostic checks.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::paths;

/// Provision a host for wallet-bound compute nodes and manage the fleet
#[derive(Parser, Debug)]
#[command(name = "nodefleet")]
#[command(version, about)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full setup: dependencies, inference, wallets, fleet
    Provision(Box<ProvisionArgs>),

    /// Generate or import wallets
    #[command(subcommand)]
    Wallet(WalletCommand),

    /// Write or list node-group definitions
    #[command(subcommand)]
    Fleet(FleetCommand),

    /// Start, restart or tail every node group
    Manage(ManageArgs),

    /// Control the local inference service
    #[command(subcommand)]
    Inference(InferenceCommand),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `nodefleet wallet`.
#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    /// Generate fresh wallets and save them to a wallet file.
    Generate(WalletGenerateArgs),
    /// Validate a wallet file and summarise its contents.
    Import(WalletImportArgs),
}

/// Subcommands for `nodefleet fleet`.
#[derive(Subcommand, Debug)]
pub enum FleetCommand {
    /// Write one group definition per wallet in a wallet file.
    Generate(FleetGenerateArgs),
    /// List the node groups found under the fleet root.
    List(FleetArgs),
}

#[derive(Subcommand, Debug)]
pub enum InferenceCommand {
    /// Launch the inference service unless it is already running.
    Start(FleetArgs),
}

/// Subcommands for `nodefleet check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Report which required host tools are installed.
    Deps(ConfigPathArg),
    /// Probe the local inference port and run the remote smoke test.
    Inference(ConfigPathArg),
}

/// Subcommands for `nodefleet config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Args, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value_os_t = paths::default_config())]
    pub config: PathBuf,
}

/// Configuration path plus fleet root override.
#[derive(Args, Debug)]
pub struct FleetArgs {
    #[command(flatten)]
    pub config: ConfigPathArg,

    /// Fleet root directory (defaults to `fleet.root`, then ~/.nodefleet/fleet).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

/// Where `provision` gets its wallets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WalletMode {
    /// Generate `--count` new wallets
    Generate,
    /// Load `--wallet-file`
    Import,
}

#[derive(Args, Debug)]
pub struct ProvisionArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,

    /// Generate new wallets or import an existing file.
    #[arg(long, value_enum)]
    pub wallets: WalletMode,

    /// Number of wallets to generate.
    #[arg(long, required_if_eq("wallets", "generate"))]
    pub count: Option<u32>,

    /// Wallet file to import, or where generated wallets are saved.
    #[arg(long, required_if_eq("wallets", "import"))]
    pub wallet_file: Option<PathBuf>,

    /// Nodes per wallet (defaults to `fleet.nodes_per_wallet`).
    #[arg(long)]
    pub nodes_per_wallet: Option<u32>,

    /// Do not install missing system packages.
    #[arg(long)]
    pub skip_install: bool,

    /// Do not launch the inference service.
    #[arg(long)]
    pub skip_inference: bool,

    /// Do not create the shared container network.
    #[arg(long)]
    pub skip_network: bool,

    /// Overwrite an existing wallet file when generating.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct WalletGenerateArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,

    /// Number of wallets to generate.
    #[arg(long)]
    pub count: u32,

    /// Output file (defaults to `<root>/wallets.json`).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct WalletImportArgs {
    /// Wallet file to validate.
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct FleetGenerateArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,

    /// Wallet file (defaults to `<root>/wallets.json`).
    #[arg(long)]
    pub wallet_file: Option<PathBuf>,

    /// Nodes per wallet (defaults to `fleet.nodes_per_wallet`).
    #[arg(long)]
    pub nodes_per_wallet: Option<u32>,

    /// Do not create the shared container network.
    #[arg(long)]
    pub skip_network: bool,
}

/// Lifecycle verbs accepted by `manage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ManageVerb {
    /// Bring every group up, building images as needed
    Start,
    /// Tear every group down and bring it back up
    Restart,
    /// Show each group's logs in turn
    Logs,
}

#[derive(Args, Debug)]
pub struct ManageArgs {
    /// Operation to run on every group.
    #[arg(value_enum)]
    pub verb: ManageVerb,

    #[command(flatten)]
    pub fleet: FleetArgs,

    /// Trailing log lines per service.
    #[arg(long, default_value_t = 100)]
    pub tail: u32,

    /// Keep streaming; interrupt moves on to the next group.
    #[arg(short, long)]
    pub follow: bool,
}

/// Arguments for the `config init` subcommand.
#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output path for the generated configuration file.
    #[arg(default_value_os_t = paths::default_config())]
    pub path: PathBuf,
    /// Overwrite the file if it already exists.
    #[arg(long)]
    pub force: bool,
}
