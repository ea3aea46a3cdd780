//! Application services (use cases).
//!
//! These services orchestrate domain logic and drive the outbound ports
//! to implement provisioning and fleet management.

pub mod fleet;
pub(crate) mod fs;
pub mod inference;
pub mod installer;
pub mod provision;
pub mod wallet;
