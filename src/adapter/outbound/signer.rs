//! Secp256k1 key generation backed by `alloy-signer-local`.

use alloy_primitives::hex;
use alloy_signer_local::PrivateKeySigner;

use crate::domain::wallet::Wallet;
use crate::error::Result;
use crate::port::outbound::keygen::KeyGenerator;

/// Generates Ethereum-style wallets from the OS random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignerKeyGenerator;

impl KeyGenerator for SignerKeyGenerator {
    fn generate(&self) -> Result<Wallet> {
        let signer = PrivateKeySigner::random();
        Ok(Wallet::new(
            signer.address().to_string(),
            hex::encode_prefixed(signer.to_bytes()),
        ))
    }
}
