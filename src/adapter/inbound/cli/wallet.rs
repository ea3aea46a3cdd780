//! Handlers for `wallet generate` and `wallet import`.

use std::io::IsTerminal;
use std::path::Path;

use dialoguer::Confirm;
use serde_json::json;

use super::command::WalletGenerateArgs;
use super::{fleet_root, load_config, output};
use crate::adapter::outbound::SignerKeyGenerator;
use crate::application::wallet::{self, WalletProvider, WALLET_FILE_NAME};
use crate::domain::wallet::WalletSet;
use crate::error::{ConfigError, Result};

/// Execute `wallet generate`.
pub fn execute_generate(args: &WalletGenerateArgs) -> Result<()> {
    let config = load_config(&args.fleet.config.config)?;
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| fleet_root(&args.fleet, &config).join(WALLET_FILE_NAME));

    let mut force = args.force;
    if path.exists() && !force && interactive() {
        force = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", path.display()))
            .default(false)
            .interact()?;
        if !force {
            return Err(ConfigError::Other("aborted, wallet file left unchanged".into()).into());
        }
    }

    let keygen = SignerKeyGenerator;
    let wallets = WalletProvider::new(&keygen).generate(args.count)?;
    wallet::save(&wallets, &path, force)?;

    output::section("Wallets Generated");
    output::field("File", path.display());
    print_addresses(&wallets);
    output::warning("the wallet file holds private keys; keep it safe");
    Ok(())
}

/// Execute `wallet import`.
pub fn execute_import(file: &Path) -> Result<()> {
    let wallets = wallet::import(file)?;

    output::section("Wallet File");
    output::field("File", file.display());
    output::success(&format!("{} valid wallets", wallets.len()));
    print_addresses(&wallets);
    Ok(())
}

fn print_addresses(wallets: &WalletSet) {
    if output::is_json() {
        output::json_output(json!({
            "count": wallets.len(),
            "addresses": wallets.iter().map(|w| w.address()).collect::<Vec<_>>(),
        }));
        return;
    }
    for (i, wallet) in wallets.iter().enumerate() {
        output::field(&format!("#{}", i + 1), output::highlight(wallet.address()));
    }
}

fn interactive() -> bool {
    !output::is_json() && std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}
