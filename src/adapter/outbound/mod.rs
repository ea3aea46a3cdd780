//! Outbound adapters (driven side).

pub mod apt;
pub mod docker;
pub mod inference;
pub mod signer;

pub use apt::{AptPackageManager, PathProbe};
pub use docker::DockerCompose;
pub use inference::{HttpCompletionProbe, ProcessSpawner};
pub use signer::SignerKeyGenerator;
