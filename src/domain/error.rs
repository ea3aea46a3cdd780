//! Domain validation errors for core domain types.
//!
//! These errors are returned by `new`/`try_new` constructors that enforce
//! the fleet invariants: at least one node per group, a non-empty wallet
//! collection, and one group per address.
//!
//! # Examples
//!
//! ```
//! use nodefleet::domain::error::DomainError;
//! use nodefleet::domain::group::NodeCount;
//!
//! assert!(matches!(NodeCount::new(0), Err(DomainError::InvalidNodeCount { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Every group must run at least one node.
    #[error("nodes per wallet must be at least 1, got {count}")]
    InvalidNodeCount {
        /// The rejected count.
        count: u32,
    },

    /// A fleet needs at least one wallet.
    #[error("wallet collection cannot be empty")]
    EmptyWalletSet,

    /// Wallet fields must be non-blank.
    #[error("wallet #{index} has an empty {field}")]
    EmptyWalletField {
        /// 1-based position of the wallet in its collection.
        index: usize,
        /// Name of the blank field.
        field: &'static str,
    },

    /// The address is not a bare alphanumeric string after its `0x` prefix.
    #[error("wallet #{index} has an invalid address {address:?}")]
    InvalidAddress {
        /// 1-based position of the wallet in its collection.
        index: usize,
        /// The rejected address.
        address: String,
    },

    /// Two wallets would map onto the same group directory.
    #[error("duplicate wallet address {address}")]
    DuplicateAddress {
        /// The repeated address.
        address: String,
    },
}
