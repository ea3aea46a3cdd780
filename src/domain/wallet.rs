//! Wallet records and validated wallet collections.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::group::{directory_name, is_valid_address};

/// A public address plus its private signing key.
///
/// The `Debug` output never includes the private key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    address: String,
    #[serde(alias = "privateKey")]
    private_key: String,
}

impl Wallet {
    /// Create a wallet from its address and private key.
    #[must_use]
    pub fn new(address: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            private_key: private_key.into(),
        }
    }

    /// The wallet's public address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The wallet's private key.
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// A non-empty, ordered collection of wallets with unique addresses.
///
/// Order is significant only for group numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSet {
    wallets: Vec<Wallet>,
}

impl WalletSet {
    /// Validate and wrap a list of wallets.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, any field is blank, an address
    /// is not alphanumeric after its `0x` prefix, or two wallets map onto the
    /// same group directory (addresses compared case-insensitively, with or
    /// without `0x`).
    pub fn try_new(wallets: Vec<Wallet>) -> Result<Self, DomainError> {
        if wallets.is_empty() {
            return Err(DomainError::EmptyWalletSet);
        }

        let mut seen = HashSet::with_capacity(wallets.len());
        for (i, wallet) in wallets.iter().enumerate() {
            let index = i + 1;
            if wallet.address.trim().is_empty() {
                return Err(DomainError::EmptyWalletField {
                    index,
                    field: "address",
                });
            }
            if wallet.private_key.trim().is_empty() {
                return Err(DomainError::EmptyWalletField {
                    index,
                    field: "private_key",
                });
            }
            if !is_valid_address(&wallet.address) {
                return Err(DomainError::InvalidAddress {
                    index,
                    address: wallet.address.clone(),
                });
            }
            if !seen.insert(directory_name(&wallet.address)) {
                return Err(DomainError::DuplicateAddress {
                    address: wallet.address.clone(),
                });
            }
        }

        Ok(Self { wallets })
    }

    /// Number of wallets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    /// True when the set holds no wallets, which construction rules out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    /// Iterate wallets in collection order.
    pub fn iter(&self) -> std::slice::Iter<'_, Wallet> {
        self.wallets.iter()
    }

    /// Borrow the wallets as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Wallet] {
        &self.wallets
    }
}

impl<'a> IntoIterator for &'a WalletSet {
    type Item = &'a Wallet;
    type IntoIter = std::slice::Iter<'a, Wallet>;

    fn into_iter(self) -> Self::IntoIter {
        self.wallets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(address: &str) -> Wallet {
        Wallet::new(address, "0xabc")
    }

    #[test]
    fn debug_redacts_private_key() {
        let w = Wallet::new("0x1111", "0xdeadbeef");
        let rendered = format!("{w:?}");
        assert!(rendered.contains("0x1111"));
        assert!(!rendered.contains("deadbeef"));
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(WalletSet::try_new(vec![]), Err(DomainError::EmptyWalletSet));
    }

    #[test]
    fn blank_private_key_is_rejected() {
        let result = WalletSet::try_new(vec![wallet("0x1"), Wallet::new("0x2", "  ")]);
        assert_eq!(
            result,
            Err(DomainError::EmptyWalletField {
                index: 2,
                field: "private_key"
            })
        );
    }

    #[test]
    fn duplicate_addresses_differing_in_case_are_rejected() {
        let result = WalletSet::try_new(vec![wallet("0xAbC"), wallet("0xabc")]);
        assert!(matches!(result, Err(DomainError::DuplicateAddress { .. })));
    }

    #[test]
    fn addresses_that_are_not_a_single_path_component_are_rejected() {
        for address in ["0xab/../../escaped", "0xcd/sub", "..", "0xab\\cd", "0x"] {
            let result = WalletSet::try_new(vec![wallet("0x1"), wallet(address)]);
            assert_eq!(
                result,
                Err(DomainError::InvalidAddress {
                    index: 2,
                    address: address.to_string()
                }),
                "{address:?}"
            );
        }
    }

    #[test]
    fn order_is_preserved() {
        let set = WalletSet::try_new(vec![wallet("0x2"), wallet("0x1")]).unwrap();
        let addresses: Vec<_> = set.iter().map(Wallet::address).collect();
        assert_eq!(addresses, vec!["0x2", "0x1"]);
    }

    #[test]
    fn deserializes_camel_case_private_key_alias() {
        let w: Wallet = serde_json::from_str(r#"{"address":"0x1","privateKey":"0x2"}"#).unwrap();
        assert_eq!(w.private_key(), "0x2");
    }
}
