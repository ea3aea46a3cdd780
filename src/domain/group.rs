//! Node groups: the per-wallet unit of the fleet.
//!
//! A group's directory name is derived from its wallet address and is the
//! only thing the fleet controller needs to discover it.

use std::fmt;

use super::error::DomainError;
use super::wallet::Wallet;

/// Directory-name prefix shared by every group directory.
pub const GROUP_DIR_PREFIX: &str = "node_group_";

/// Name of the container-group definition file inside a group directory.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Number of nodes to run per wallet. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeCount(u32);

impl NodeCount {
    /// Validate a node count.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidNodeCount`] when `count` is zero.
    pub fn new(count: u32) -> Result<Self, DomainError> {
        if count == 0 {
            return Err(DomainError::InvalidNodeCount { count });
        }
        Ok(Self(count))
    }

    /// The count as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The address without surrounding whitespace or its `0x` prefix.
fn bare_address(address: &str) -> &str {
    let trimmed = address.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// True if the address can name a group directory: a non-empty run of
/// ASCII letters and digits once the `0x` prefix is dropped.
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    let bare = bare_address(address);
    !bare.is_empty() && bare.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Derive the group directory name for a wallet address.
///
/// The `0x` prefix is dropped and the address lowercased, so checksummed and
/// lowercase spellings of the same address land in the same directory.
/// Callers must have checked the address with [`is_valid_address`].
#[must_use]
pub fn directory_name(address: &str) -> String {
    format!(
        "{GROUP_DIR_PREFIX}{}",
        bare_address(address).to_ascii_lowercase()
    )
}

/// True if `name` follows the group directory naming convention.
#[must_use]
pub fn is_group_directory(name: &str) -> bool {
    name.len() > GROUP_DIR_PREFIX.len() && name.starts_with(GROUP_DIR_PREFIX)
}

/// Deterministic service name for node `node_index` of wallet `wallet_index`.
///
/// Both indices are 1-based.
#[must_use]
pub fn service_name(wallet_index: usize, node_index: u32) -> String {
    format!("compute_node_{wallet_index}_{node_index}")
}

/// One wallet's set of nodes.
#[derive(Debug, Clone)]
pub struct NodeGroup<'a> {
    wallet: &'a Wallet,
    wallet_index: usize,
    node_count: NodeCount,
    directory_name: String,
}

impl<'a> NodeGroup<'a> {
    /// Build the group for the wallet at 1-based `wallet_index`.
    #[must_use]
    pub fn new(wallet: &'a Wallet, wallet_index: usize, node_count: NodeCount) -> Self {
        Self {
            wallet,
            wallet_index,
            node_count,
            directory_name: directory_name(wallet.address()),
        }
    }

    #[must_use]
    pub fn wallet(&self) -> &Wallet {
        self.wallet
    }

    #[must_use]
    pub fn wallet_index(&self) -> usize {
        self.wallet_index
    }

    #[must_use]
    pub fn node_count(&self) -> NodeCount {
        self.node_count
    }

    #[must_use]
    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }

    /// Service names for every node in the group, in node order.
    pub fn service_names(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.node_count.get()).map(|node| service_name(self.wallet_index, node))
    }
}
