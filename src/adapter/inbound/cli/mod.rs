//! CLI module graph and shared handler helpers.

pub mod check;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod fleet;
pub mod inference;
pub mod manage;
pub mod output;
pub mod paths;
pub mod provision;
pub mod wallet;

use std::path::{Path, PathBuf};

use tracing::debug;

use self::command::{
    CheckCommand, Cli, Commands, ConfigCommand, FleetArgs, FleetCommand, InferenceCommand,
    WalletCommand,
};
use crate::error::{ConfigError, Error, Result};
use crate::infrastructure::config::Config;

/// Run the parsed command line.
///
/// # Errors
///
/// Returns whatever the selected handler returns.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Provision(args) => provision::execute(&args).await,
        Commands::Wallet(WalletCommand::Generate(args)) => wallet::execute_generate(&args),
        Commands::Wallet(WalletCommand::Import(args)) => wallet::execute_import(&args.file),
        Commands::Fleet(FleetCommand::Generate(args)) => fleet::execute_generate(&args),
        Commands::Fleet(FleetCommand::List(args)) => fleet::execute_list(&args),
        Commands::Manage(args) => manage::execute(&args),
        Commands::Inference(InferenceCommand::Start(args)) => inference::execute_start(&args).await,
        Commands::Check(CheckCommand::Deps(args)) => check::execute_deps(&args.config),
        Commands::Check(CheckCommand::Inference(args)) => {
            check::execute_inference(&args.config).await
        }
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
    }
}

/// Load configuration and start logging.
///
/// A missing file at the default location yields built-in defaults; any
/// other missing path is an error. Parse errors are rendered as a source
/// diagnostic on stderr.
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Config::parse_toml(&content).map_err(|e| render_parse_error(path, &content, e))?
    } else if path == paths::default_config() {
        Config::load_or_default(path)?
    } else {
        return Err(Error::NotFound {
            what: "config file",
            path: path.to_path_buf(),
        });
    };

    config.init_logging(output::verbosity());
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Print a parse error with source context and return a summary error.
fn render_parse_error(path: &Path, content: &str, err: Error) -> Error {
    let Error::Config(ConfigError::Parse(parse)) = &err else {
        return err;
    };
    let Some(diagnostic) = diagnostic::ConfigError::from_toml(path.display().to_string(), content, parse)
    else {
        return err;
    };
    if !output::is_json() {
        eprintln!("{:?}", miette::Report::new(diagnostic));
    }
    err
}

/// Resolve the fleet root for a command.
pub(crate) fn fleet_root(args: &FleetArgs, config: &Config) -> PathBuf {
    paths::resolve_fleet_root(args.root.as_deref(), config.fleet.root.as_deref())
}
