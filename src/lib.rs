//! Nodefleet - provision a host for wallet-bound compute nodes.
//!
//! The crate installs host dependencies, launches a local inference
//! service, produces a wallet collection and writes one container-group
//! definition per wallet. A small controller then fans `start`, `restart`
//! and `logs` out across every group it finds on disk.
//!
//! # Architecture
//!
//! Hexagonal layout:
//!
//! - [`domain`] - Wallets, node groups, compose definitions, the manifest
//! - [`port`] - Traits for the container runtime, key generation, package
//!   installation and the inference service
//! - [`application`] - Use cases: wallet provider, fleet generator and
//!   controller, installer, inference launcher, provisioner
//! - [`adapter`] - Docker, `apt-get`, alloy signer, reqwest; the CLI
//! - [`infrastructure`] - Configuration and adapter wiring
//!
//! # Example
//!
//! ```no_run
//! use nodefleet::adapter::outbound::DockerCompose;
//! use nodefleet::application::fleet::{FleetAction, FleetController};
//!
//! let docker = DockerCompose::new("docker", vec!["docker".into(), "compose".into()])?;
//! let report = FleetController::new(&docker, "/srv/fleet").run(FleetAction::Start)?;
//! println!("{} groups started", report.succeeded());
//! # Ok::<(), nodefleet::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
