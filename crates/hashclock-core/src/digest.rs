//! Strong types for the chain's fixed-size values.
//!
//! A [`Digest`] is the 256-bit output of one compression step; a
//! [`MessageBlock`] is the 512-bit compression input. Byte-level
//! serialization is little-endian per word on every platform, so the
//! checkpoint log format and the block derivation are host-independent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit chain digest, held as 8 u32 words.
///
/// Produced only by a compression backend. Immutable once computed;
/// each chain step yields exactly one new digest from the previous one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u32; 8]);

impl Digest {
    /// Number of words in a digest.
    pub const WORDS: usize = 8;

    /// Serialized length in bytes.
    pub const LEN: usize = 32;

    /// Create from raw words.
    pub const fn from_words(words: [u32; 8]) -> Self {
        Self(words)
    }

    /// Get the raw words.
    pub const fn as_words(&self) -> &[u32; 8] {
        &self.0
    }

    /// Serialize to 32 bytes, little-endian per word.
    pub fn to_le_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Deserialize from 32 bytes, little-endian per word.
    pub fn from_le_bytes(bytes: &[u8; 32]) -> Self {
        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(words)
    }

    /// Convert to hex string (of the little-endian byte serialization).
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_le_bytes())
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| hex::FromHexError::InvalidStringLength)?;
        Ok(Self::from_le_bytes(&arr))
    }

    /// The all-zero digest (sentinel, not a reachable chain value).
    pub const ZERO: Self = Self([0u32; 8]);
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl From<[u32; 8]> for Digest {
    fn from(words: [u32; 8]) -> Self {
        Self(words)
    }
}

/// A 512-bit compression input block.
///
/// Invariant: after step i, both 32-byte halves hold Digest_i. The
/// entire input to step i+1 is derived solely from the previous
/// 256-bit output, which is what makes the chain serially dependent.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MessageBlock([u8; 64]);

impl MessageBlock {
    /// Block length in bytes.
    pub const LEN: usize = 64;

    /// Build the block for the next step: the digest duplicated into
    /// both halves.
    pub fn from_digest(digest: &Digest) -> Self {
        let half = digest.to_le_bytes();
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&half);
        bytes[32..].copy_from_slice(&half);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Check that both halves duplicate the given digest.
    pub fn duplicates(&self, digest: &Digest) -> bool {
        let half = digest.to_le_bytes();
        self.0[..32] == half && self.0[32..] == half
    }
}

impl fmt::Debug for MessageBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageBlock({})", &hex::encode(&self.0[..8]))
    }
}

impl AsRef<[u8]> for MessageBlock {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_le_bytes_roundtrip() {
        let digest = Digest::from_words([
            0x6a09e667, 0xbb67ae85, 0x3c6ef372, 0xa54ff53a, 0x510e527f, 0x9b05688c, 0x1f83d9ab,
            0x5be0cd19,
        ]);
        let bytes = digest.to_le_bytes();
        assert_eq!(bytes[0], 0x67);
        assert_eq!(bytes[3], 0x6a);
        assert_eq!(Digest::from_le_bytes(&bytes), digest);
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = Digest::from_words([1, 2, 3, 4, 5, 6, 7, 8]);
        let recovered = Digest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, recovered);
    }

    #[test]
    fn test_digest_from_hex_rejects_bad_length() {
        assert!(Digest::from_hex("abcd").is_err());
    }

    #[test]
    fn test_block_duplicates_digest() {
        let digest = Digest::from_words([0xdead_beef; 8]);
        let block = MessageBlock::from_digest(&digest);
        assert!(block.duplicates(&digest));
        assert_eq!(&block.as_bytes()[..32], &block.as_bytes()[32..]);
        assert_eq!(&block.as_bytes()[..32], &digest.to_le_bytes());
    }

    #[test]
    fn test_block_does_not_duplicate_other_digest() {
        let block = MessageBlock::from_digest(&Digest::from_words([1; 8]));
        assert!(!block.duplicates(&Digest::from_words([2; 8])));
    }
}
