//! Group discovery and manifest persistence.
//!
//! Groups are found by directory name alone; the manifest is read only to
//! report drift.

use std::fs;
use std::path::{Path, PathBuf};

use crate::application::fs::write_atomic;
use crate::domain::group::{is_group_directory, COMPOSE_FILE_NAME};
use crate::domain::manifest::{FleetManifest, MANIFEST_FILE_NAME};
use crate::error::{Error, Result};

/// A group directory found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDir {
    pub name: String,
    pub path: PathBuf,
}

impl GroupDir {
    /// Path of the group's container definition file.
    #[must_use]
    pub fn definition(&self) -> PathBuf {
        self.path.join(COMPOSE_FILE_NAME)
    }
}

/// List group directories under `root`, sorted by name.
///
/// A missing root is an empty fleet.
///
/// # Errors
///
/// Returns an error if `root` exists but cannot be read.
pub fn discover(root: &Path) -> Result<Vec<GroupDir>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut groups = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_group_directory(&name) {
            groups.push(GroupDir {
                name,
                path: entry.path(),
            });
        }
    }
    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}

/// Path of the manifest for a fleet root.
#[must_use]
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILE_NAME)
}

/// Read the manifest, if one has been written.
///
/// # Errors
///
/// Returns [`Error::Format`] if the manifest exists but does not parse.
pub fn load_manifest(root: &Path) -> Result<Option<FleetManifest>> {
    let path = manifest_path(root);
    if !path.is_file() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path)?;
    let manifest = serde_json::from_str(&contents).map_err(|e| Error::Format {
        path,
        reason: e.to_string(),
    })?;
    Ok(Some(manifest))
}

/// Write the manifest atomically.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_manifest(root: &Path, manifest: &FleetManifest) -> Result<()> {
    let rendered = serde_json::to_string_pretty(manifest)?;
    write_atomic(&manifest_path(root), rendered.as_bytes(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("absent")).unwrap().is_empty());
    }

    #[test]
    fn only_prefixed_directories_are_groups() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("node_group_bb")).unwrap();
        fs::create_dir(dir.path().join("node_group_aa")).unwrap();
        fs::create_dir(dir.path().join("other")).unwrap();
        fs::write(dir.path().join("node_group_cc"), "a file, not a dir").unwrap();

        let names: Vec<_> = discover(dir.path())
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["node_group_aa", "node_group_bb"]);
    }

    #[test]
    fn malformed_manifest_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(manifest_path(dir.path()), "{").unwrap();
        assert!(matches!(
            load_manifest(dir.path()),
            Err(Error::Format { .. })
        ));
    }
}
