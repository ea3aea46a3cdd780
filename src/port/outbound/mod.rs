//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the host collaborators the fleet depends on:
//! the container runtime, key generation, package installation and the
//! inference service.

pub mod inference;
pub mod installer;
pub mod keygen;
pub mod runtime;
