//! Handler for `provision`.

use super::command::{ProvisionArgs, WalletMode};
use super::{fleet, fleet_root, inference, load_config, output};
use crate::adapter::outbound::{PathProbe, ProcessSpawner, SignerKeyGenerator};
use crate::application::fleet::FleetGenerator;
use crate::application::inference::InferenceLauncher;
use crate::application::installer::DependencyInstaller;
use crate::application::provision::{InferenceStep, ProvisionPlan, Provisioner};
use crate::application::wallet::{WalletProvider, WalletSource, WALLET_FILE_NAME};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::outbound::inference::CompletionProbe;

/// Execute `provision`.
pub async fn execute(args: &ProvisionArgs) -> Result<()> {
    let config = load_config(&args.fleet.config.config)?;
    let root = fleet_root(&args.fleet, &config);
    let wallet_file = args
        .wallet_file
        .clone()
        .unwrap_or_else(|| root.join(WALLET_FILE_NAME));

    let wallets = match args.wallets {
        WalletMode::Generate => WalletSource::Generate {
            count: args.count.unwrap_or_default(),
        },
        WalletMode::Import => WalletSource::Import {
            path: wallet_file.clone(),
        },
    };
    let plan = ProvisionPlan {
        requirements: (!args.skip_install).then(|| config.installer.requirements.clone()),
        inference: (!args.skip_inference).then(|| InferenceStep {
            plan: bootstrap::launch_plan(&config, &root),
            api_key: config.inference.api_key.clone(),
            smoke_model: config.inference.smoke_model.clone(),
            smoke_prompt: config.inference.smoke_prompt.clone(),
        }),
        wallets,
        wallet_file,
        overwrite_wallets: args.force,
        nodes_per_wallet: args
            .nodes_per_wallet
            .unwrap_or(config.fleet.nodes_per_wallet),
        ensure_network: !args.skip_network,
    };

    let probe = PathProbe;
    let packages = bootstrap::package_manager(&config);
    let spawner = ProcessSpawner;
    let completion = bootstrap::completion_probe(&config)?;
    let keygen = SignerKeyGenerator;
    let runtime = bootstrap::container_runtime(&config)?;

    let provisioner = Provisioner {
        installer: DependencyInstaller::new(&probe, &packages),
        launcher: InferenceLauncher::new(
            &spawner,
            completion.as_ref().map(|p| p as &dyn CompletionProbe),
        ),
        wallets: WalletProvider::new(&keygen),
        generator: FleetGenerator::new(
            &runtime,
            config.fleet.template(),
            config.fleet.subnet.clone(),
            &root,
        ),
    };

    output::header(env!("CARGO_PKG_VERSION"));
    let spinner = output::spinner("Provisioning host...");
    let report = match provisioner.run(&plan).await {
        Ok(report) => {
            output::spinner_success(&spinner, "Host provisioned");
            report
        }
        Err(e) => {
            output::spinner_fail(&spinner, "Provisioning failed");
            return Err(e);
        }
    };

    output::section("Dependencies");
    match &report.install {
        None => output::note("skipped"),
        Some(install) if install.was_noop() => output::success("all tools already installed"),
        Some(install) => output::success(&format!("installed {}", install.installed.join(", "))),
    }

    output::section("Inference");
    match &report.inference {
        None => output::note("skipped"),
        Some((launch, smoke)) => {
            inference::print_launch(*launch);
            inference::print_smoke(smoke);
        }
    }

    output::section("Wallets");
    output::field("Count", report.wallet_count);
    if let Some(path) = &report.wallet_file {
        output::field("Saved to", path.display());
    }

    output::section("Fleet");
    fleet::print_generation(&report.fleet, &root);
    output::hint("run `nodefleet manage start` to bring the fleet up");
    Ok(())
}
