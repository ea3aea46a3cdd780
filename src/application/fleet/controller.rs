//! Fleet controller: fan a lifecycle verb out over every discovered group.
//!
//! Groups are processed one after another. A failure in one group is
//! recorded and the loop moves on; nothing is rolled back.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::discovery::{self, GroupDir};
use crate::domain::manifest::ManifestDrift;
use crate::error::{Error, FleetError, Result};
use crate::port::outbound::runtime::{ContainerRuntime, LogOptions};

/// The three lifecycle verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetAction {
    /// Bring every group up, building images as needed.
    Start,
    /// Tear every group down, then bring it up again.
    Restart,
    /// Stream each group's logs in turn.
    Logs(LogOptions),
}

impl FleetAction {
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Restart => "restart",
            Self::Logs(_) => "logs",
        }
    }
}

impl fmt::Display for FleetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Progress notifications emitted while the controller runs.
#[derive(Debug)]
pub enum GroupEvent<'a> {
    Started(&'a GroupDir),
    Finished(&'a GroupDir, &'a Result<()>),
}

/// Result for one group.
#[derive(Debug)]
pub struct GroupOutcome {
    pub directory: String,
    pub result: Result<()>,
}

/// Result of a whole fan-out.
#[derive(Debug)]
pub struct FleetReport {
    pub action: FleetAction,
    pub outcomes: Vec<GroupOutcome>,
    /// Differences against the manifest, when one exists.
    pub drift: Option<ManifestDrift>,
}

impl FleetReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Outcomes that ended in an error.
    pub fn failures(&self) -> impl Iterator<Item = &GroupOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }
}

/// Runs lifecycle verbs over the groups under one fleet root.
pub struct FleetController<'a> {
    runtime: &'a dyn ContainerRuntime,
    root: PathBuf,
}

impl<'a> FleetController<'a> {
    pub fn new(runtime: &'a dyn ContainerRuntime, root: impl Into<PathBuf>) -> Self {
        Self {
            runtime,
            root: root.into(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `action` on every group.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::NothingToDo`] when no groups exist, or an error
    /// if the fleet root cannot be read. Per-group failures are reported in
    /// the returned [`FleetReport`], not as an error.
    pub fn run(&self, action: FleetAction) -> Result<FleetReport> {
        self.run_with(action, |_| {})
    }

    /// Like [`Self::run`], calling `observe` before and after each group.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub fn run_with<F>(&self, action: FleetAction, mut observe: F) -> Result<FleetReport>
    where
        F: FnMut(GroupEvent<'_>),
    {
        let groups = discovery::discover(&self.root)?;
        if groups.is_empty() {
            return Err(FleetError::NothingToDo {
                root: self.root.clone(),
            }
            .into());
        }

        let drift = self.check_drift(&groups);

        info!(action = %action, groups = groups.len(), runtime = self.runtime.name(), "fleet operation");

        let mut outcomes = Vec::with_capacity(groups.len());
        for group in &groups {
            observe(GroupEvent::Started(group));
            let result = self.apply(action, group);
            if let Err(e) = &result {
                warn!(group = %group.name, action = %action, error = %e, "group operation failed");
            }
            observe(GroupEvent::Finished(group, &result));
            outcomes.push(GroupOutcome {
                directory: group.name.clone(),
                result,
            });
        }

        Ok(FleetReport {
            action,
            outcomes,
            drift,
        })
    }

    fn apply(&self, action: FleetAction, group: &GroupDir) -> Result<()> {
        let definition = group.definition();
        if !definition.is_file() {
            return Err(Error::NotFound {
                what: "group definition",
                path: definition,
            });
        }

        match action {
            FleetAction::Start => self.runtime.up(&definition),
            FleetAction::Restart => {
                self.runtime.down(&definition)?;
                self.runtime.up(&definition)
            }
            FleetAction::Logs(options) => self.runtime.logs(&definition, options),
        }
    }

    fn check_drift(&self, groups: &[GroupDir]) -> Option<ManifestDrift> {
        let manifest = match discovery::load_manifest(&self.root) {
            Ok(manifest) => manifest?,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable manifest");
                return None;
            }
        };

        let drift = manifest.drift(groups.iter().map(|g| g.name.as_str()));
        for missing in &drift.missing {
            warn!(group = %missing, "listed in manifest but missing on disk");
        }
        for unlisted in &drift.unlisted {
            warn!(group = %unlisted, "present on disk but not in manifest");
        }
        Some(drift)
    }
}
