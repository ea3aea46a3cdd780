//! Handler for `manage start|restart|logs`.

use serde_json::json;
use tracing::debug;

use super::command::{ManageArgs, ManageVerb};
use super::{fleet_root, load_config, output};
use crate::application::fleet::{FleetAction, FleetController, FleetReport, GroupEvent};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap;
use crate::port::outbound::runtime::LogOptions;

/// Execute `manage`.
///
/// Per-group failures are reported but do not fail the command.
pub fn execute(args: &ManageArgs) -> Result<()> {
    let config = load_config(&args.fleet.config.config)?;
    let root = fleet_root(&args.fleet, &config);
    let runtime = bootstrap::container_runtime(&config)?;

    let action = match args.verb {
        ManageVerb::Start => FleetAction::Start,
        ManageVerb::Restart => FleetAction::Restart,
        ManageVerb::Logs => FleetAction::Logs(LogOptions {
            tail: args.tail,
            follow: args.follow,
        }),
    };

    if args.follow && args.verb == ManageVerb::Logs {
        // The child sees the interrupt and exits; we survive it and move on.
        ctrlc::set_handler(|| debug!("interrupt received, moving to next group"))
            .map_err(|e| Error::external("signal handler", e.to_string()))?;
    }

    let controller = FleetController::new(&runtime, &root);
    let report = controller.run_with(action, |event| match (action, event) {
        (FleetAction::Logs(_), GroupEvent::Started(group)) => output::section(&group.name),
        (_, GroupEvent::Started(group)) => output::action(progressive(action), &group.name),
        (_, GroupEvent::Finished(group, Err(e))) => {
            output::error(&format!("{}: {e}", group.name));
        }
        (FleetAction::Logs(_), GroupEvent::Finished(..)) => {}
        (_, GroupEvent::Finished(group, Ok(()))) => output::action_done(past(action), &group.name),
    })?;

    print_summary(&report);
    Ok(())
}

fn progressive(action: FleetAction) -> &'static str {
    match action {
        FleetAction::Start => "Starting",
        FleetAction::Restart => "Restarting",
        FleetAction::Logs(_) => "Reading",
    }
}

fn past(action: FleetAction) -> &'static str {
    match action {
        FleetAction::Start => "Started",
        FleetAction::Restart => "Restarted",
        FleetAction::Logs(_) => "Read",
    }
}

fn print_summary(report: &FleetReport) {
    if let Some(drift) = &report.drift {
        for missing in &drift.missing {
            output::warning(&format!("{missing} is in the manifest but missing on disk"));
        }
    }

    if output::is_json() {
        output::json_output(json!({
            "action": report.action.verb(),
            "succeeded": report.succeeded(),
            "failed": report.failed(),
            "failures": report
                .failures()
                .map(|o| json!({
                    "group": o.directory,
                    "error": o.result.as_ref().err().map(ToString::to_string),
                }))
                .collect::<Vec<_>>(),
        }));
        return;
    }

    output::section("Summary");
    output::field("Action", report.action);
    output::field("Succeeded", report.succeeded());
    if report.failed() > 0 {
        output::warning(&format!("{} group(s) failed", report.failed()));
    }
}
