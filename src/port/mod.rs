//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌──────────┐           ┌─────────────┐              ┌───────────┐
//! │Container │           │  Packages / │              │ Inference │
//! │ Runtime  │           │  Key Gen    │              │  Service  │
//! └──────────┘           └─────────────┘              └───────────┘
//! ```

pub mod outbound;

pub use outbound::inference::{CompletionProbe, ProbeResponse, ServiceSpawner, SpawnSpec};
pub use outbound::installer::{PackageManager, ToolProbe};
pub use outbound::keygen::KeyGenerator;
pub use outbound::runtime::{ContainerRuntime, LogOptions};
