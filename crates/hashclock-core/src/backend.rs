//! The compression backend contract and the built-in implementations.
//!
//! A backend is a pure function from (running state, consecutive
//! 64-byte blocks) to a new running state. Backends are interchangeable
//! and must be bit-identical on identical input; they differ only in
//! speed and in the hardware features they require. There is no "wrong
//! but close" backend, only absent ones, so resolution of an id that is
//! not usable fails instead of falling back.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of one compression input block in bytes.
pub const BLOCK_LEN: usize = 64;

/// A small integer identifying a compression backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendId(pub u8);

impl BackendId {
    /// The in-crate scalar implementation.
    pub const PORTABLE: Self = Self(0);

    /// The `sha2` crate implementation (SIMD / SHA-NI via runtime
    /// dispatch where the host supports it).
    pub const ACCELERATED: Self = Self(1);
}

impl fmt::Debug for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BackendId({})", self.0)
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for BackendId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// An interchangeable implementation of the SHA-256 compression
/// primitive.
///
/// `compress` folds `blocks.len() / 64` consecutive blocks into
/// `state`, Merkle-Damgard chained in order. The chain engine always
/// passes exactly one block; larger batches exist for callers hashing
/// independent data (and for benchmarking).
///
/// # Panics
///
/// `compress` panics if `blocks` is empty or not a multiple of 64
/// bytes. Buffer sizes are structural invariants of the primitive, not
/// runtime conditions to recover from.
pub trait CompressionBackend: Send + Sync {
    /// The id this backend is registered under.
    fn id(&self) -> BackendId;

    /// Human-readable name for logs and errors.
    fn name(&self) -> &'static str;

    /// Whether the hardware features this backend requires are present.
    ///
    /// Checked at registry construction so an unusable backend fails at
    /// startup, never mid-chain.
    fn is_supported(&self) -> bool {
        true
    }

    /// Fold consecutive 64-byte blocks into `state`.
    fn compress(&self, state: &mut [u32; 8], blocks: &[u8]);
}

fn check_block_len(blocks: &[u8]) {
    assert!(
        !blocks.is_empty() && blocks.len() % BLOCK_LEN == 0,
        "compression input must be a non-empty multiple of {} bytes, got {}",
        BLOCK_LEN,
        blocks.len()
    );
}

/// SHA-256 round constants (FIPS 180-4, section 4.2.2).
const K: [u32; 64] = [
    0x428a2f98, 0x71374491, 0xb5c0fbcf, 0xe9b5dba5, 0x3956c25b, 0x59f111f1, 0x923f82a4, 0xab1c5ed5,
    0xd807aa98, 0x12835b01, 0x243185be, 0x550c7dc3, 0x72be5d74, 0x80deb1fe, 0x9bdc06a7, 0xc19bf174,
    0xe49b69c1, 0xefbe4786, 0x0fc19dc6, 0x240ca1cc, 0x2de92c6f, 0x4a7484aa, 0x5cb0a9dc, 0x76f988da,
    0x983e5152, 0xa831c66d, 0xb00327c8, 0xbf597fc7, 0xc6e00bf3, 0xd5a79147, 0x06ca6351, 0x14292967,
    0x27b70a85, 0x2e1b2138, 0x4d2c6dfc, 0x53380d13, 0x650a7354, 0x766a0abb, 0x81c2c92e, 0x92722c85,
    0xa2bfe8a1, 0xa81a664b, 0xc24b8b70, 0xc76c51a3, 0xd192e819, 0xd6990624, 0xf40e3585, 0x106aa070,
    0x19a4c116, 0x1e376c08, 0x2748774c, 0x34b0bcb5, 0x391c0cb3, 0x4ed8aa4a, 0x5b9cca4f, 0x682e6ff3,
    0x748f82ee, 0x78a5636f, 0x84c87814, 0x8cc70208, 0x90befffa, 0xa4506ceb, 0xbef9a3f7, 0xc67178f2,
];

/// The portable scalar backend: a straight FIPS 180-4 compression
/// function with no hardware requirements and no dispatch overhead.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableBackend;

impl PortableBackend {
    fn compress_block(state: &mut [u32; 8], block: &[u8]) {
        let mut w = [0u32; 64];
        for (word, chunk) in w.iter_mut().zip(block.chunks_exact(4)) {
            *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        for i in 16..64 {
            let s0 = w[i - 15].rotate_right(7) ^ w[i - 15].rotate_right(18) ^ (w[i - 15] >> 3);
            let s1 = w[i - 2].rotate_right(17) ^ w[i - 2].rotate_right(19) ^ (w[i - 2] >> 10);
            w[i] = w[i - 16]
                .wrapping_add(s0)
                .wrapping_add(w[i - 7])
                .wrapping_add(s1);
        }

        let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;

        for i in 0..64 {
            let s1 = e.rotate_right(6) ^ e.rotate_right(11) ^ e.rotate_right(25);
            let ch = (e & f) ^ (!e & g);
            let t1 = h
                .wrapping_add(s1)
                .wrapping_add(ch)
                .wrapping_add(K[i])
                .wrapping_add(w[i]);
            let s0 = a.rotate_right(2) ^ a.rotate_right(13) ^ a.rotate_right(22);
            let maj = (a & b) ^ (a & c) ^ (b & c);
            let t2 = s0.wrapping_add(maj);

            h = g;
            g = f;
            f = e;
            e = d.wrapping_add(t1);
            d = c;
            c = b;
            b = a;
            a = t1.wrapping_add(t2);
        }

        state[0] = state[0].wrapping_add(a);
        state[1] = state[1].wrapping_add(b);
        state[2] = state[2].wrapping_add(c);
        state[3] = state[3].wrapping_add(d);
        state[4] = state[4].wrapping_add(e);
        state[5] = state[5].wrapping_add(f);
        state[6] = state[6].wrapping_add(g);
        state[7] = state[7].wrapping_add(h);
    }
}

impl CompressionBackend for PortableBackend {
    fn id(&self) -> BackendId {
        BackendId::PORTABLE
    }

    fn name(&self) -> &'static str {
        "portable"
    }

    fn compress(&self, state: &mut [u32; 8], blocks: &[u8]) {
        check_block_len(blocks);
        for block in blocks.chunks_exact(BLOCK_LEN) {
            Self::compress_block(state, block);
        }
    }
}

/// The accelerated backend, built on the `sha2` crate's exported
/// compression function. `sha2` dispatches to SHA-NI/AVX at runtime on
/// hosts that have them, so this backend is always available.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceleratedBackend;

impl CompressionBackend for AcceleratedBackend {
    fn id(&self) -> BackendId {
        BackendId::ACCELERATED
    }

    fn name(&self) -> &'static str {
        "accelerated"
    }

    fn compress(&self, state: &mut [u32; 8], blocks: &[u8]) {
        use sha2::digest::generic_array::GenericArray;

        check_block_len(blocks);
        for block in blocks.chunks_exact(BLOCK_LEN) {
            sha2::compress256(state, std::slice::from_ref(GenericArray::from_slice(block)));
        }
    }
}
