//! Handler for `inference start` and shared inference output.

use super::command::FleetArgs;
use super::{fleet_root, load_config, output};
use crate::adapter::outbound::ProcessSpawner;
use crate::application::inference::{require_api_key, InferenceLauncher, LaunchOutcome, SmokeOutcome};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::outbound::inference::CompletionProbe;

/// Execute `inference start`.
pub async fn execute_start(args: &FleetArgs) -> Result<()> {
    let config = load_config(&args.config.config)?;
    let root = fleet_root(args, &config);
    let api_key = require_api_key(config.inference.api_key.as_deref())?;

    let spawner = ProcessSpawner;
    let completion = bootstrap::completion_probe(&config)?;
    let launcher = InferenceLauncher::new(
        &spawner,
        completion.as_ref().map(|p| p as &dyn CompletionProbe),
    );
    let plan = bootstrap::launch_plan(&config, &root);

    let spinner = output::spinner("Starting inference service...");
    let launched = match launcher.launch(&plan, api_key).await {
        Ok(outcome) => {
            output::spinner_success(&spinner, "Inference service ready");
            outcome
        }
        Err(e) => {
            output::spinner_fail(&spinner, "Inference service failed to start");
            return Err(e);
        }
    };

    output::section("Inference");
    print_launch(launched);
    output::field("Log", plan.log_file.display());
    let smoke = launcher
        .smoke_test(
            api_key,
            &config.inference.smoke_model,
            &config.inference.smoke_prompt,
        )
        .await;
    print_smoke(&smoke);
    Ok(())
}

pub(crate) fn print_launch(outcome: LaunchOutcome) {
    match outcome {
        LaunchOutcome::AlreadyRunning => output::success("already running"),
        LaunchOutcome::Started { pid } => output::success(&format!("started (pid {pid})")),
    }
}

pub(crate) fn print_smoke(outcome: &SmokeOutcome) {
    match outcome {
        SmokeOutcome::Skipped => output::note("smoke test skipped (no inference.smoke_url)"),
        SmokeOutcome::Passed { status, .. } => {
            output::success(&format!("smoke test passed (HTTP {status})"));
        }
        SmokeOutcome::Rejected { status, body } => {
            output::warning(&format!("smoke test returned HTTP {status}"));
            output::lines(body);
        }
        SmokeOutcome::Unreachable { error } => {
            output::warning(&format!("smoke test failed: {error}"));
        }
    }
}
