//! The on-disk checkpoint record codec.
//!
//! One record is 48 bytes, no header, no length prefix:
//!
//! ```text
//! [0..8)   step index, u64 little-endian
//! [8..40)  digest, 8 u32 words little-endian
//! [40..48) CRC-64 of bytes [0..40), u64 little-endian
//! ```
//!
//! The checksum lets recovery distinguish a true trailing checkpoint
//! from torn or corrupted bytes; a record that fails its checksum is
//! treated as absent, never as a fabricated chain state.

use serde::{Deserialize, Serialize};

use hashclock_core::{ChainState, Digest};

/// Serialized record length in bytes.
pub const RECORD_LEN: usize = 48;

const CRC_OFFSET: usize = 40;

/// A (step index, digest) pair marking a point the chain is known to
/// have reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// The global step index.
    pub step: u64,
    /// The digest produced at `step`.
    pub digest: Digest,
}

impl Checkpoint {
    /// Snapshot a chain state.
    pub fn from_state(state: &ChainState) -> Self {
        Self {
            step: state.step(),
            digest: *state.digest(),
        }
    }

    /// Reconstruct the full chain state, re-deriving the message block
    /// by duplicating the digest into both halves.
    pub fn to_state(&self) -> ChainState {
        ChainState::at(self.step, self.digest)
    }

    /// Serialize to one on-disk record.
    pub fn encode(&self) -> [u8; RECORD_LEN] {
        let mut buf = [0u8; RECORD_LEN];
        buf[..8].copy_from_slice(&self.step.to_le_bytes());
        buf[8..CRC_OFFSET].copy_from_slice(&self.digest.to_le_bytes());
        let crc = crc64(&buf[..CRC_OFFSET]);
        buf[CRC_OFFSET..].copy_from_slice(&crc.to_le_bytes());
        buf
    }

    /// Deserialize one record, returning `None` if the checksum does
    /// not match.
    pub fn decode(buf: &[u8; RECORD_LEN]) -> Option<Self> {
        let stored = u64::from_le_bytes(buf[CRC_OFFSET..].try_into().ok()?);
        if crc64(&buf[..CRC_OFFSET]) != stored {
            return None;
        }

        let step = u64::from_le_bytes(buf[..8].try_into().ok()?);
        let digest_bytes: [u8; 32] = buf[8..CRC_OFFSET].try_into().ok()?;
        Some(Self {
            step,
            digest: Digest::from_le_bytes(&digest_bytes),
        })
    }
}

fn crc64(bytes: &[u8]) -> u64 {
    let mut digest = crc64fast::Digest::new();
    digest.write(bytes);
    digest.sum64()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Checkpoint {
        Checkpoint {
            step: 0x1122_3344_5566_7788,
            digest: Digest::from_words([1, 2, 3, 4, 5, 6, 7, 8]),
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let checkpoint = sample();
        let buf = checkpoint.encode();
        assert_eq!(Checkpoint::decode(&buf), Some(checkpoint));
    }

    #[test]
    fn test_encode_layout() {
        let buf = sample().encode();
        // Step is little-endian.
        assert_eq!(&buf[..8], &[0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11]);
        // First digest word, little-endian.
        assert_eq!(&buf[8..12], &[1, 0, 0, 0]);
    }

    #[test]
    fn test_decode_rejects_flipped_bit() {
        let mut buf = sample().encode();
        for i in 0..RECORD_LEN {
            buf[i] ^= 0x01;
            assert_eq!(Checkpoint::decode(&buf), None, "flip at byte {i}");
            buf[i] ^= 0x01;
        }
        // Untouched buffer still decodes.
        assert!(Checkpoint::decode(&buf).is_some());
    }

    #[test]
    fn test_state_roundtrip_rederives_block() {
        let checkpoint = sample();
        let state = checkpoint.to_state();
        assert_eq!(state.step(), checkpoint.step);
        assert_eq!(state.digest(), &checkpoint.digest);
        assert!(state.block().duplicates(&checkpoint.digest));
        assert_eq!(Checkpoint::from_state(&state), checkpoint);
    }
}
