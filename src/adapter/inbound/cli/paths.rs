//! Path utilities for nodefleet.
//!
//! Defaults live under `~/.nodefleet/`:
//! - `~/.nodefleet/config.toml` - main configuration
//! - `~/.nodefleet/fleet/` - fleet root (group directories, manifest, wallets)

use std::path::{Path, PathBuf};

/// Returns the nodefleet home directory (`~/.nodefleet/`).
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".nodefleet")
}

/// Returns the default config file path (`~/.nodefleet/config.toml`).
pub fn default_config() -> PathBuf {
    home_dir().join("config.toml")
}

/// Returns the default fleet root (`~/.nodefleet/fleet/`).
pub fn default_fleet_root() -> PathBuf {
    home_dir().join("fleet")
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Pick the fleet root: command line, then config, then the default.
pub fn resolve_fleet_root(flag: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    flag.or(configured)
        .map(expand_home)
        .unwrap_or_else(default_fleet_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_under_nodefleet_home() {
        assert!(default_config().to_string_lossy().contains(".nodefleet"));
        assert!(default_fleet_root().starts_with(home_dir()));
    }

    #[test]
    fn flag_wins_over_config() {
        let root = resolve_fleet_root(Some(Path::new("/a")), Some(Path::new("/b")));
        assert_eq!(root, Path::new("/a"));

        let root = resolve_fleet_root(None, Some(Path::new("/b")));
        assert_eq!(root, Path::new("/b"));

        assert_eq!(resolve_fleet_root(None, None), default_fleet_root());
    }

    #[test]
    fn tilde_is_expanded() {
        let expanded = expand_home(Path::new("~/fleet"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join("fleet"));
        }
        assert_eq!(expand_home(Path::new("/srv/fleet")), Path::new("/srv/fleet"));
    }
}
