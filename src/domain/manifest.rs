//! Explicit record of the groups a generator run produced.
//!
//! Group directories on disk stay authoritative for the controller; the
//! manifest exists to spot drift left behind by partial provisioning runs.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the manifest inside the fleet root.
pub const MANIFEST_FILE_NAME: &str = "fleet.json";

const MANIFEST_VERSION: u32 = 1;

/// One generated group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub directory: String,
    pub address: String,
    pub wallet_index: usize,
    pub node_count: u32,
}

/// Persisted list of known groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetManifest {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
    pub groups: Vec<ManifestEntry>,
}

impl Default for FleetManifest {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            updated_at: Utc::now(),
            groups: Vec::new(),
        }
    }
}

/// Differences between the manifest and the directories on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDrift {
    /// Listed in the manifest but absent on disk.
    pub missing: Vec<String>,
    /// Present on disk but not listed.
    pub unlisted: Vec<String>,
}

impl ManifestDrift {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unlisted.is_empty()
    }
}

impl FleetManifest {
    /// Insert or replace entries keyed by directory, keeping other groups.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = ManifestEntry>) {
        for entry in entries {
            match self
                .groups
                .iter()
                .position(|existing| existing.directory == entry.directory)
            {
                Some(i) => self.groups[i] = entry,
                None => self.groups.push(entry),
            }
        }
        self.groups.sort_by(|a, b| a.directory.cmp(&b.directory));
        self.updated_at = Utc::now();
    }

    /// Look up the entry for a group directory.
    #[must_use]
    pub fn entry(&self, directory: &str) -> Option<&ManifestEntry> {
        self.groups.iter().find(|entry| entry.directory == directory)
    }

    /// Compare against the group directories discovered on disk.
    #[must_use]
    pub fn drift<'a>(&self, on_disk: impl IntoIterator<Item = &'a str>) -> ManifestDrift {
        let on_disk: BTreeSet<&str> = on_disk.into_iter().collect();
        let listed: BTreeSet<&str> = self.groups.iter().map(|e| e.directory.as_str()).collect();

        ManifestDrift {
            missing: listed
                .difference(&on_disk)
                .map(|s| (*s).to_string())
                .collect(),
            unlisted: on_disk
                .difference(&listed)
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(directory: &str, nodes: u32) -> ManifestEntry {
        ManifestEntry {
            directory: directory.to_string(),
            address: format!("0x{directory}"),
            wallet_index: 1,
            node_count: nodes,
        }
    }

    #[test]
    fn merge_replaces_same_directory_and_keeps_others() {
        let mut manifest = FleetManifest::default();
        manifest.merge([entry("node_group_b", 1), entry("node_group_a", 1)]);
        manifest.merge([entry("node_group_b", 4)]);

        assert_eq!(manifest.groups.len(), 2);
        assert_eq!(manifest.groups[0].directory, "node_group_a");
        assert_eq!(manifest.entry("node_group_b").map(|e| e.node_count), Some(4));
    }

    #[test]
    fn drift_reports_both_directions() {
        let mut manifest = FleetManifest::default();
        manifest.merge([entry("node_group_a", 1), entry("node_group_b", 1)]);

        let drift = manifest.drift(["node_group_b", "node_group_c"]);
        assert_eq!(drift.missing, vec!["node_group_a".to_string()]);
        assert_eq!(drift.unlisted, vec!["node_group_c".to_string()]);
        assert!(!drift.is_clean());

        assert!(manifest.drift(["node_group_a", "node_group_b"]).is_clean());
    }
}
