//! End-to-end host provisioning.
//!
//! Installer, inference launcher, wallet provider and fleet generator run in
//! that order. Every step takes explicit paths. The first error aborts the
//! run; only the smoke test is allowed to fail softly.

use std::path::PathBuf;

use tracing::info;

use super::fleet::{FleetGenerator, GenerationReport};
use super::inference::{require_api_key, InferenceLauncher, LaunchOutcome, LaunchPlan, SmokeOutcome};
use super::installer::{DependencyInstaller, InstallReport, ToolRequirement};
use super::wallet::{self, WalletProvider, WalletSource};
use crate::domain::group::NodeCount;
use crate::error::Result;

/// Inference step parameters.
#[derive(Debug, Clone)]
pub struct InferenceStep {
    pub plan: LaunchPlan,
    pub api_key: Option<String>,
    pub smoke_model: String,
    pub smoke_prompt: String,
}

#[derive(Debug, Clone)]
pub struct ProvisionPlan {
    /// `None` skips dependency installation.
    pub requirements: Option<Vec<ToolRequirement>>,
    /// `None` skips the inference service.
    pub inference: Option<InferenceStep>,
    pub wallets: WalletSource,
    /// Where generated wallets are saved.
    pub wallet_file: PathBuf,
    pub overwrite_wallets: bool,
    pub nodes_per_wallet: u32,
    pub ensure_network: bool,
}

#[derive(Debug)]
pub struct ProvisionReport {
    pub install: Option<InstallReport>,
    pub inference: Option<(LaunchOutcome, SmokeOutcome)>,
    /// Set when wallets were generated and written to disk.
    pub wallet_file: Option<PathBuf>,
    pub wallet_count: usize,
    pub fleet: GenerationReport,
}

/// Wires the four setup components together.
pub struct Provisioner<'a> {
    pub installer: DependencyInstaller<'a>,
    pub launcher: InferenceLauncher<'a>,
    pub wallets: WalletProvider<'a>,
    pub generator: FleetGenerator<'a>,
}

impl Provisioner<'_> {
    /// Run every enabled step.
    ///
    /// Input that can be validated up front (node count, API key, an existing
    /// wallet file) is checked before the first side effect.
    ///
    /// # Errors
    ///
    /// Returns the first setup error encountered.
    pub async fn run(&self, plan: &ProvisionPlan) -> Result<ProvisionReport> {
        NodeCount::new(plan.nodes_per_wallet)?;
        if let Some(step) = &plan.inference {
            require_api_key(step.api_key.as_deref())?;
        }
        if let WalletSource::Generate { .. } = plan.wallets {
            wallet::check_writable(&plan.wallet_file, plan.overwrite_wallets)?;
        }

        let install = match &plan.requirements {
            Some(requirements) => Some(self.installer.ensure(requirements)?),
            None => None,
        };

        let inference = match &plan.inference {
            Some(step) => {
                let api_key = require_api_key(step.api_key.as_deref())?;
                let launched = self.launcher.launch(&step.plan, api_key).await?;
                let smoke = self
                    .launcher
                    .smoke_test(api_key, &step.smoke_model, &step.smoke_prompt)
                    .await;
                Some((launched, smoke))
            }
            None => None,
        };

        let wallets = self.wallets.provide(&plan.wallets)?;
        let wallet_file = match plan.wallets {
            WalletSource::Generate { .. } => {
                wallet::save(&wallets, &plan.wallet_file, plan.overwrite_wallets)?;
                Some(plan.wallet_file.clone())
            }
            WalletSource::Import { .. } => None,
        };

        let fleet = self
            .generator
            .generate(&wallets, plan.nodes_per_wallet, plan.ensure_network)?;
        info!(
            wallets = wallets.len(),
            groups = fleet.groups.len(),
            "provisioning complete"
        );

        Ok(ProvisionReport {
            install,
            inference,
            wallet_file,
            wallet_count: wallets.len(),
            fleet,
        })
    }
}
