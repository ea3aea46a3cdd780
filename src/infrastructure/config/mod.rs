//! Infrastructure configuration modules.

pub mod fleet;
pub mod inference;
pub mod installer;
pub mod logging;
pub mod settings;

pub use settings::Config;
