//! The chain step engine: the per-step state transition.
//!
//! One step is `state' = compress(IV, block)`, after which the new
//! digest is duplicated into both halves of the next block. The IV is
//! the chaining base of every call and never changes; the serial
//! dependency lives entirely in the block.
//!
//! Steps are serially dependent by construction, so `advance_n` is N
//! single-block compressions and throughput scaling must come from a
//! faster backend, never from overlapping steps. Distinct chains own
//! disjoint state and may run on separate threads without
//! synchronization.

use std::sync::Arc;

use crate::backend::CompressionBackend;
use crate::digest::{Digest, MessageBlock};
use crate::params::{ChainId, ChainParams};

/// The complete state of one chain: (step, digest, block).
///
/// The step index strictly increases by one per compression and is
/// never reused. The block always holds the digest duplicated into
/// both halves; the fields are private so that invariant cannot be
/// broken from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainState {
    step: u64,
    digest: Digest,
    block: MessageBlock,
}

impl ChainState {
    /// The canonical start of a chain: step 0, digest = IV.
    pub fn genesis(params: &ChainParams) -> Self {
        Self::at(0, *params.iv())
    }

    /// Reconstruct the state at a known (step, digest) point, re-deriving
    /// the block by duplication. Used when resuming from a checkpoint.
    pub fn at(step: u64, digest: Digest) -> Self {
        Self {
            step,
            digest,
            block: MessageBlock::from_digest(&digest),
        }
    }

    /// The global step index.
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// The digest produced at [`Self::step`].
    pub const fn digest(&self) -> &Digest {
        &self.digest
    }

    /// The message block the next step will compress.
    pub const fn block(&self) -> &MessageBlock {
        &self.block
    }
}

/// Advances a chain, one compression per step.
///
/// The engine exclusively owns the [`ChainState`] it is handed during
/// advancement; collaborators only ever see snapshots.
pub struct ChainEngine {
    params: ChainParams,
    backend: Arc<dyn CompressionBackend>,
}

impl ChainEngine {
    /// Build an engine over fixed parameters and a resolved backend.
    pub fn new(params: ChainParams, backend: Arc<dyn CompressionBackend>) -> Self {
        Self { params, backend }
    }

    /// The parameters this engine's chains run under.
    pub const fn params(&self) -> &ChainParams {
        &self.params
    }

    /// The identity of chains this engine produces.
    pub fn chain_id(&self) -> ChainId {
        self.params.chain_id()
    }

    /// The backend executing compressions.
    pub fn backend(&self) -> &dyn CompressionBackend {
        self.backend.as_ref()
    }

    /// The canonical starting state under this engine's parameters.
    pub fn genesis(&self) -> ChainState {
        ChainState::genesis(&self.params)
    }

    /// Advance the chain by one step.
    pub fn advance(&self, state: &mut ChainState) {
        let mut words = *self.params.iv().as_words();
        self.backend.compress(&mut words, state.block.as_bytes());

        state.digest = Digest::from_words(words);
        state.block = MessageBlock::from_digest(&state.digest);
        state.step += 1;
    }

    /// Advance the chain by `n` sequential steps.
    ///
    /// Always batch size 1 per compression call: each block depends on
    /// the previous step's output, so there is nothing to batch.
    pub fn advance_n(&self, state: &mut ChainState, n: u64) {
        for _ in 0..n {
            self.advance(state);
        }
    }
}
