//! Dependency installer: make sure required host tools are present.
//!
//! Idempotent. When every binary is already on `PATH` the package manager
//! is never invoked.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::port::outbound::installer::{PackageManager, ToolProbe};

/// A binary that must be on `PATH` and the package that provides it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolRequirement {
    pub binary: String,
    pub package: String,
}

impl ToolRequirement {
    pub fn new(binary: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            package: package.into(),
        }
    }
}

/// Where a required tool was found, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub requirement: ToolRequirement,
    pub location: Option<PathBuf>,
}

impl ToolStatus {
    #[must_use]
    pub fn is_present(&self) -> bool {
        self.location.is_some()
    }
}

/// What [`DependencyInstaller::ensure`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Tools that were already installed.
    pub already_present: Vec<String>,
    /// Packages installed by this run.
    pub installed: Vec<String>,
}

impl InstallReport {
    /// True when nothing had to be installed.
    #[must_use]
    pub fn was_noop(&self) -> bool {
        self.installed.is_empty()
    }
}

pub struct DependencyInstaller<'a> {
    probe: &'a dyn ToolProbe,
    packages: &'a dyn PackageManager,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(probe: &'a dyn ToolProbe, packages: &'a dyn PackageManager) -> Self {
        Self { probe, packages }
    }

    /// Probe every requirement without installing anything.
    #[must_use]
    pub fn check(&self, requirements: &[ToolRequirement]) -> Vec<ToolStatus> {
        requirements
            .iter()
            .map(|requirement| ToolStatus {
                location: self.probe.locate(&requirement.binary),
                requirement: requirement.clone(),
            })
            .collect()
    }

    /// Install the packages for any missing tools, then verify.
    ///
    /// # Errors
    ///
    /// Returns the package manager's error if installation fails, or
    /// [`Error::NotFound`] if a tool is still missing afterwards.
    pub fn ensure(&self, requirements: &[ToolRequirement]) -> Result<InstallReport> {
        let statuses = self.check(requirements);

        let mut report = InstallReport::default();
        let mut missing = Vec::new();
        for status in statuses {
            match status.location {
                Some(path) => {
                    debug!(binary = %status.requirement.binary, path = %path.display(), "tool present");
                    report.already_present.push(status.requirement.binary);
                }
                None => missing.push(status.requirement),
            }
        }

        if missing.is_empty() {
            return Ok(report);
        }

        let mut packages: Vec<String> = missing.iter().map(|r| r.package.clone()).collect();
        packages.sort();
        packages.dedup();

        info!(
            manager = self.packages.name(),
            packages = %packages.join(" "),
            "installing missing packages"
        );
        self.packages.install(&packages)?;

        for requirement in &missing {
            if self.probe.locate(&requirement.binary).is_none() {
                return Err(Error::NotFound {
                    what: "tool after install",
                    path: PathBuf::from(&requirement.binary),
                });
            }
        }

        report.installed = packages;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;

    /// Probe backed by a set of installed binaries that installs mutate.
    struct FakeHost {
        installed: Mutex<HashSet<String>>,
        calls: Mutex<Vec<Vec<String>>>,
        provides: fn(&str) -> Option<&'static str>,
    }

    impl FakeHost {
        fn with(binaries: &[&str], provides: fn(&str) -> Option<&'static str>) -> Self {
            Self {
                installed: Mutex::new(binaries.iter().map(|b| b.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
                provides,
            }
        }
    }

    impl ToolProbe for FakeHost {
        fn locate(&self, binary: &str) -> Option<PathBuf> {
            let installed = self.installed.lock().unwrap();
            installed
                .contains(binary)
                .then(|| PathBuf::from("/usr/bin").join(binary))
        }
    }

    impl PackageManager for FakeHost {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn install(&self, packages: &[String]) -> Result<()> {
            self.calls.lock().unwrap().push(packages.to_vec());
            let mut installed = self.installed.lock().unwrap();
            for package in packages {
                if let Some(binary) = (self.provides)(package) {
                    installed.insert(binary.to_string());
                }
            }
            Ok(())
        }
    }

    fn requirements() -> Vec<ToolRequirement> {
        vec![
            ToolRequirement::new("curl", "curl"),
            ToolRequirement::new("docker", "docker.io"),
        ]
    }

    fn docker_provides(package: &str) -> Option<&'static str> {
        match package {
            "docker.io" => Some("docker"),
            "curl" => Some("curl"),
            _ => None,
        }
    }

    fn provides_nothing(_: &str) -> Option<&'static str> {
        None
    }

    #[test]
    fn noop_when_everything_is_present() {
        let host = FakeHost::with(&["curl", "docker"], docker_provides);
        let report = DependencyInstaller::new(&host, &host)
            .ensure(&requirements())
            .unwrap();

        assert!(report.was_noop());
        assert_eq!(report.already_present, vec!["curl", "docker"]);
        assert!(host.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn installs_only_missing_packages_in_one_call() {
        let host = FakeHost::with(&["curl"], docker_provides);
        let report = DependencyInstaller::new(&host, &host)
            .ensure(&requirements())
            .unwrap();

        assert_eq!(report.installed, vec!["docker.io"]);
        assert_eq!(*host.calls.lock().unwrap(), vec![vec!["docker.io".to_string()]]);

        // Second run is a no-op.
        let again = DependencyInstaller::new(&host, &host)
            .ensure(&requirements())
            .unwrap();
        assert!(again.was_noop());
    }

    #[test]
    fn still_missing_after_install_is_not_found() {
        let host = FakeHost::with(&[], provides_nothing);
        let err = DependencyInstaller::new(&host, &host)
            .ensure(&requirements())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn check_reports_locations() {
        let host = FakeHost::with(&["docker"], docker_provides);
        let statuses = DependencyInstaller::new(&host, &host).check(&requirements());
        assert!(!statuses[0].is_present());
        assert_eq!(
            statuses[1].location.as_deref(),
            Some(std::path::Path::new("/usr/bin/docker"))
        );
    }
}
