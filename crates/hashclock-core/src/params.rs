//! Chain parameters: the fixed IV and the derived chain identity.
//!
//! The IV is the chaining base of every compression call in a chain's
//! life. It is deliberately an explicit configuration value handed to
//! engine construction, not a process-wide static: two engines with
//! different parameters produce unrelated chains, and the [`ChainId`]
//! makes that identity visible instead of implicit.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

use crate::digest::Digest;

/// The SHA-256 initial hash constants (FIPS 180-4, section 5.3.3).
pub const SHA256_IV: [u32; 8] = [
    0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab, 0x5be0cd19,
];

/// Immutable parameters of a chain.
///
/// The IV never changes across the life of a chain; reinitializing it
/// would silently start a new, unrelated chain while appearing to
/// continue the old one.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    iv: Digest,
}

impl ChainParams {
    /// The standard parameters: SHA-256 initial hash constants as IV.
    pub const fn standard() -> Self {
        Self {
            iv: Digest(SHA256_IV),
        }
    }

    /// Construct with an explicit IV.
    pub const fn with_iv(iv: Digest) -> Self {
        Self { iv }
    }

    /// The chaining base used by every compression call.
    pub const fn iv(&self) -> &Digest {
        &self.iv
    }

    /// The identity of chains produced under these parameters.
    pub fn chain_id(&self) -> ChainId {
        ChainId::derive(self)
    }
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ChainParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainParams")
            .field("iv", &self.iv)
            .field("chain_id", &self.chain_id())
            .finish()
    }
}

/// A 32-byte chain identity, derived from the IV.
///
/// Two chains share an id exactly when they share parameters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub [u8; 32]);

impl ChainId {
    /// Derive a chain id from parameters, with domain separation.
    pub fn derive(params: &ChainParams) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"hashclock-chain-v0:");
        hasher.update(params.iv().to_le_bytes());
        Self(hasher.finalize().into())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}
