//! Fleet use-cases: writing group definitions and driving their lifecycle.

pub mod controller;
pub mod discovery;
pub mod generator;

pub use controller::{FleetAction, FleetController, FleetReport, GroupEvent, GroupOutcome};
pub use discovery::{discover, GroupDir};
pub use generator::{FleetGenerator, GeneratedGroup, GenerationReport};
