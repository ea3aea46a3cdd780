//! Handlers for `fleet generate` and `fleet list`.

use std::path::Path;

use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::command::{FleetArgs, FleetGenerateArgs};
use super::{fleet_root, load_config, output};
use crate::application::fleet::{discovery, FleetGenerator, GenerationReport};
use crate::application::wallet::{self, WALLET_FILE_NAME};
use crate::error::Result;
use crate::infrastructure::bootstrap;

/// Execute `fleet generate`.
pub fn execute_generate(args: &FleetGenerateArgs) -> Result<()> {
    let config = load_config(&args.fleet.config.config)?;
    let root = fleet_root(&args.fleet, &config);
    let wallet_file = args
        .wallet_file
        .clone()
        .unwrap_or_else(|| root.join(WALLET_FILE_NAME));
    let nodes_per_wallet = args
        .nodes_per_wallet
        .unwrap_or(config.fleet.nodes_per_wallet);

    let wallets = wallet::import(&wallet_file)?;
    let runtime = bootstrap::container_runtime(&config)?;
    let generator = FleetGenerator::new(
        &runtime,
        config.fleet.template(),
        config.fleet.subnet.clone(),
        &root,
    );
    let report = generator.generate(&wallets, nodes_per_wallet, !args.skip_network)?;

    output::section("Fleet Generated");
    print_generation(&report, &root);
    output::hint("run `nodefleet manage start` to bring the fleet up");
    Ok(())
}

/// Print the result of a generator run.
pub(crate) fn print_generation(report: &GenerationReport, root: &Path) {
    output::field("Root", root.display());
    match report.network_created {
        Some(true) => output::field("Network", "created"),
        Some(false) => output::field("Network", "already present"),
        None => output::field("Network", "skipped"),
    }
    for group in &report.groups {
        output::action_done(
            "Wrote",
            &format!("{} ({} nodes)", group.directory, group.services.len()),
        );
    }
    output::field("Manifest", report.manifest.display());
}

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Group")]
    directory: String,
    #[tabled(rename = "Wallet")]
    address: String,
    #[tabled(rename = "Nodes")]
    nodes: String,
    #[tabled(rename = "Definition")]
    definition: &'static str,
}

/// Execute `fleet list`.
pub fn execute_list(args: &FleetArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let root = fleet_root(args, &config);

    let groups = discovery::discover(&root)?;
    let manifest = discovery::load_manifest(&root)?;

    let rows: Vec<GroupRow> = groups
        .iter()
        .map(|group| {
            let entry = manifest.as_ref().and_then(|m| m.entry(&group.name));
            GroupRow {
                directory: group.name.clone(),
                address: entry.map_or_else(|| "?".to_string(), |e| e.address.clone()),
                nodes: entry.map_or_else(|| "?".to_string(), |e| e.node_count.to_string()),
                definition: if group.definition().is_file() {
                    "ok"
                } else {
                    "missing"
                },
            }
        })
        .collect();

    if output::is_json() {
        output::json_output(json!({
            "root": root,
            "groups": rows
                .iter()
                .map(|r| json!({
                    "directory": r.directory,
                    "address": r.address,
                    "nodes": r.nodes,
                    "definition": r.definition,
                }))
                .collect::<Vec<_>>(),
        }));
        return Ok(());
    }

    output::section("Fleet");
    output::field("Root", root.display());
    if rows.is_empty() {
        output::note("(no node groups)");
        return Ok(());
    }
    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    output::table(table);

    let Some(manifest) = manifest else {
        output::warning("no manifest found; run `nodefleet fleet generate` to record one");
        return Ok(());
    };
    let drift = manifest.drift(groups.iter().map(|g| g.name.as_str()));
    for missing in &drift.missing {
        output::warning(&format!("{missing} is in the manifest but missing on disk"));
    }
    for unlisted in &drift.unlisted {
        output::warning(&format!("{unlisted} is on disk but not in the manifest"));
    }
    Ok(())
}
