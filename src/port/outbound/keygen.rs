//! Key-pair generation port.

use crate::domain::wallet::Wallet;
use crate::error::Result;

/// Source of fresh wallets.
///
/// Implementations must draw key material from a cryptographically secure
/// random number generator.
pub trait KeyGenerator: Send + Sync {
    /// Generate one new wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if key generation fails.
    fn generate(&self) -> Result<Wallet>;
}
