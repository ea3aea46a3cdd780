//! Fleet domain model: wallets, node groups and their container definitions.
//!
//! Nothing in here touches the filesystem, the network or a child process.

pub mod compose;
pub mod error;
pub mod group;
pub mod manifest;
pub mod wallet;

pub use compose::{ComposeFile, RestartPolicy, ServiceDefinition, ServiceTemplate};
pub use group::{NodeCount, NodeGroup};
pub use manifest::{FleetManifest, ManifestDrift, ManifestEntry};
pub use wallet::{Wallet, WalletSet};
