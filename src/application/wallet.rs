//! Wallet provider: generate fresh wallets or load an existing collection.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::fs::write_atomic;
use crate::domain::wallet::{Wallet, WalletSet};
use crate::error::{ConfigError, Error, Result};
use crate::port::outbound::keygen::KeyGenerator;

/// Default name of the wallet collection file inside the fleet root.
pub const WALLET_FILE_NAME: &str = "wallets.json";

/// Where wallets come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletSource {
    /// Generate `count` fresh wallets.
    Generate { count: u32 },
    /// Load an existing wallet collection file.
    Import { path: PathBuf },
}

/// Produces the ordered wallet collection for a provisioning run.
pub struct WalletProvider<'a> {
    keygen: &'a dyn KeyGenerator,
}

impl<'a> WalletProvider<'a> {
    #[must_use]
    pub fn new(keygen: &'a dyn KeyGenerator) -> Self {
        Self { keygen }
    }

    /// Resolve a [`WalletSource`] into a wallet collection.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`] and [`import`].
    pub fn provide(&self, source: &WalletSource) -> Result<WalletSet> {
        match source {
            WalletSource::Generate { count } => self.generate(*count),
            WalletSource::Import { path } => import(path),
        }
    }

    /// Generate `count` wallets in generation order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `count` is zero, or the key
    /// generator's error.
    pub fn generate(&self, count: u32) -> Result<WalletSet> {
        if count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "count",
                reason: "must be a positive integer".to_string(),
            }
            .into());
        }

        let wallets = (0..count)
            .map(|_| self.keygen.generate())
            .collect::<Result<Vec<_>>>()?;
        info!(count, "generated wallets");

        Ok(WalletSet::try_new(wallets)?)
    }
}

/// Load and validate a wallet collection file.
///
/// Only syntax is checked: the file must be a JSON array of objects with
/// non-blank `address` and `private_key` strings, alphanumeric addresses and
/// no duplicates. Key material itself is not verified.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `path` is not a file and [`Error::Format`]
/// for anything that does not parse into a usable collection.
pub fn import(path: &Path) -> Result<WalletSet> {
    if !path.is_file() {
        return Err(Error::NotFound {
            what: "wallet file",
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path)?;
    let wallets: Vec<Wallet> = serde_json::from_str(&contents).map_err(|e| Error::Format {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let set = WalletSet::try_new(wallets).map_err(|e| Error::Format {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(path = %path.display(), count = set.len(), "imported wallets");
    Ok(set)
}

/// Persist a wallet collection as a private (`0600`) JSON file.
///
/// # Errors
///
/// Returns a configuration error if the file exists and `force` is false.
pub fn save(wallets: &WalletSet, path: &Path, force: bool) -> Result<()> {
    check_writable(path, force)?;

    let rendered = serde_json::to_string_pretty(wallets.as_slice())?;
    write_atomic(path, rendered.as_bytes(), Some(0o600))?;
    info!(path = %path.display(), count = wallets.len(), "saved wallets");
    Ok(())
}

/// Fail if `path` exists and may not be overwritten.
///
/// # Errors
///
/// Returns a configuration error if the file exists and `force` is false.
pub fn check_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "wallet file",
            reason: format!("{} already exists (use --force to overwrite)", path.display()),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingKeygen(AtomicUsize);

    impl KeyGenerator for CountingKeygen {
        fn generate(&self) -> Result<Wallet> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Wallet::new(format!("0x{n:040x}"), format!("0x{n:064x}")))
        }
    }

    fn keygen() -> CountingKeygen {
        CountingKeygen(AtomicUsize::new(0))
    }

    #[test]
    fn generate_produces_requested_count_in_order() {
        let keygen = keygen();
        let set = WalletProvider::new(&keygen).generate(3).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.as_slice()[0].address().ends_with('1'));
        assert!(set.as_slice()[2].address().ends_with('3'));
    }

    #[test]
    fn generate_zero_is_a_configuration_error() {
        let keygen = keygen();
        let err = WalletProvider::new(&keygen).generate(0).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidValue { field: "count", .. })));
        assert_eq!(keygen.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn import_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = import(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.is_not_found());

        // A directory is not a file either.
        assert!(import(dir.path()).unwrap_err().is_not_found());
    }

    #[test]
    fn import_rejects_malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            "not json",
            "{\"address\": \"0x1\", \"private_key\": \"0x2\"}",
            "[]",
            "[{\"address\": \"0x1\"}]",
            "[{\"address\": \"\", \"private_key\": \"0x2\"}]",
            "[{\"address\": 7, \"private_key\": \"0x2\"}]",
            "[{\"address\": \"0xab/../../escaped\", \"private_key\": \"0x2\"}]",
            "[{\"address\": \"0xcd/sub\", \"private_key\": \"0x2\"}]",
        ];
        for (i, case) in cases.iter().enumerate() {
            let path = dir.path().join(format!("case{i}.json"));
            fs::write(&path, case).unwrap();
            let err = import(&path).unwrap_err();
            assert!(matches!(err, Error::Format { .. }), "case {i}: {err}");
        }
    }

    #[test]
    fn save_then_import_preserves_wallets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WALLET_FILE_NAME);
        let keygen = keygen();
        let set = WalletProvider::new(&keygen).generate(2).unwrap();

        save(&set, &path, false).unwrap();
        assert_eq!(import(&path).unwrap(), set);
    }

    #[test]
    fn save_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WALLET_FILE_NAME);
        let keygen = keygen();
        let set = WalletProvider::new(&keygen).generate(1).unwrap();

        save(&set, &path, false).unwrap();
        assert!(matches!(
            save(&set, &path, false),
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));
        save(&set, &path, true).unwrap();
    }
}
