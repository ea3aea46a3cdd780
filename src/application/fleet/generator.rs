//! Fleet template generator: one container-group definition per wallet.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::discovery;
use crate::application::fs::write_atomic;
use crate::domain::compose::{ComposeFile, ServiceTemplate};
use crate::domain::group::{NodeCount, NodeGroup, COMPOSE_FILE_NAME};
use crate::domain::manifest::{FleetManifest, ManifestEntry};
use crate::domain::wallet::WalletSet;
use crate::error::Result;
use crate::port::outbound::runtime::ContainerRuntime;

/// A group written by a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedGroup {
    pub directory: String,
    pub definition: PathBuf,
    pub address: String,
    pub services: Vec<String>,
}

/// Summary of a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub groups: Vec<GeneratedGroup>,
    /// `None` when network handling was skipped, otherwise whether this run
    /// created the network.
    pub network_created: Option<bool>,
    pub manifest: PathBuf,
}

/// Writes group definitions under a fleet root.
pub struct FleetGenerator<'a> {
    runtime: &'a dyn ContainerRuntime,
    template: ServiceTemplate,
    subnet: String,
    root: PathBuf,
}

impl<'a> FleetGenerator<'a> {
    pub fn new(
        runtime: &'a dyn ContainerRuntime,
        template: ServiceTemplate,
        subnet: impl Into<String>,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runtime,
            template,
            subnet: subnet.into(),
            root: root.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one definition per wallet with `nodes_per_wallet` services each.
    ///
    /// The node count is validated before anything else happens, so a bad
    /// count leaves the filesystem and the runtime untouched. The shared
    /// network is ensured before the first group is written unless
    /// `ensure_network` is false. Existing definitions for the same wallets
    /// are overwritten; other group directories are not touched. If a group
    /// fails to write, the groups written before it are still recorded in
    /// the manifest.
    ///
    /// # Errors
    ///
    /// Returns a domain error for a zero node count, or the first runtime or
    /// IO error encountered.
    pub fn generate(
        &self,
        wallets: &WalletSet,
        nodes_per_wallet: u32,
        ensure_network: bool,
    ) -> Result<GenerationReport> {
        let node_count = NodeCount::new(nodes_per_wallet)?;

        let network_created = if ensure_network {
            let created = self
                .runtime
                .ensure_network(&self.template.network, &self.subnet)?;
            if created {
                info!(network = %self.template.network, subnet = %self.subnet, "created network");
            }
            Some(created)
        } else {
            None
        };

        let mut groups = Vec::with_capacity(wallets.len());
        for (i, wallet) in wallets.iter().enumerate() {
            let group = NodeGroup::new(wallet, i + 1, node_count);
            match self.write_group(&group) {
                Ok(generated) => groups.push(generated),
                Err(e) => {
                    // Groups already on disk stay listed.
                    if !groups.is_empty() {
                        if let Err(manifest_err) = self.update_manifest(&groups, node_count) {
                            warn!(error = %manifest_err, "could not record partial generation");
                        }
                    }
                    return Err(e);
                }
            }
        }

        let manifest = self.update_manifest(&groups, node_count)?;

        Ok(GenerationReport {
            groups,
            network_created,
            manifest,
        })
    }

    fn write_group(&self, group: &NodeGroup<'_>) -> Result<GeneratedGroup> {
        let compose = ComposeFile::for_group(group, &self.template);
        let rendered = compose.to_yaml()?;

        let definition = self
            .root
            .join(group.directory_name())
            .join(COMPOSE_FILE_NAME);
        // Holds a private key.
        write_atomic(&definition, rendered.as_bytes(), Some(0o600))?;

        info!(
            group = group.directory_name(),
            nodes = group.node_count().get(),
            "wrote group definition"
        );

        Ok(GeneratedGroup {
            directory: group.directory_name().to_string(),
            definition,
            address: group.wallet().address().to_string(),
            services: compose.services.keys().cloned().collect(),
        })
    }

    fn update_manifest(&self, groups: &[GeneratedGroup], node_count: NodeCount) -> Result<PathBuf> {
        let mut manifest = match discovery::load_manifest(&self.root) {
            Ok(existing) => existing.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "replacing unreadable manifest");
                FleetManifest::default()
            }
        };

        manifest.merge(groups.iter().enumerate().map(|(i, group)| ManifestEntry {
            directory: group.directory.clone(),
            address: group.address.clone(),
            wallet_index: i + 1,
            node_count: node_count.get(),
        }));
        discovery::save_manifest(&self.root, &manifest)?;
        Ok(discovery::manifest_path(&self.root))
    }
}
