//! Backend registry and selection policy.
//!
//! Backends are resolved once, at startup, through a registry mapping
//! id to capability-checked implementation. Unknown or unsupported ids
//! are hard errors: a silent fallback would change the speed
//! characteristics of the chain behind the operator's back, and pinning
//! a known-good backend after a regression must be reliable.

use std::sync::Arc;

use crate::backend::{AcceleratedBackend, BackendId, CompressionBackend, PortableBackend};
use crate::error::{EngineError, Result};

/// Policy for choosing a backend when the caller does not pin one.
///
/// The threshold is an example default, not a tuned constant; deployments
/// are expected to set it from measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Batch sizes at or above this many blocks use `large_batch`.
    pub batch_threshold: usize,
    /// Backend for small batches: tuned for low per-call overhead.
    pub small_batch: BackendId,
    /// Backend for large batches: tuned for sustained throughput.
    pub large_batch: BackendId,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            batch_threshold: 10_000,
            small_batch: BackendId::PORTABLE,
            large_batch: BackendId::ACCELERATED,
        }
    }
}

/// Registry of available compression backends.
pub struct BackendRegistry {
    backends: Vec<Arc<dyn CompressionBackend>>,
    policy: SelectionPolicy,
}

impl BackendRegistry {
    /// Registry with the built-in backends and the default policy.
    pub fn builtin() -> Self {
        Self::with_policy(SelectionPolicy::default())
    }

    /// Registry with the built-in backends and an explicit policy.
    pub fn with_policy(policy: SelectionPolicy) -> Self {
        Self {
            backends: vec![Arc::new(PortableBackend), Arc::new(AcceleratedBackend)],
            policy,
        }
    }

    /// The active selection policy.
    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    /// Ids of all registered backends, supported or not.
    pub fn ids(&self) -> Vec<BackendId> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    /// Resolve an explicit backend id.
    ///
    /// Fails on ids that are not registered or whose hardware
    /// requirements this host does not meet.
    pub fn resolve(&self, id: BackendId) -> Result<Arc<dyn CompressionBackend>> {
        let backend = self
            .backends
            .iter()
            .find(|b| b.id() == id)
            .ok_or(EngineError::UnknownBackend(id))?;

        if !backend.is_supported() {
            return Err(EngineError::UnsupportedBackend {
                id,
                name: backend.name(),
            });
        }

        Ok(Arc::clone(backend))
    }

    /// Choose a backend for a batch of `num_blocks` blocks.
    ///
    /// An explicit `pinned` id is always honored (or errors); without
    /// one the policy picks by batch size.
    pub fn select(
        &self,
        num_blocks: usize,
        pinned: Option<BackendId>,
    ) -> Result<Arc<dyn CompressionBackend>> {
        if let Some(id) = pinned {
            return self.resolve(id);
        }

        let id = if num_blocks >= self.policy.batch_threshold {
            self.policy.large_batch
        } else {
            self.policy.small_batch
        };
        self.resolve(id)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_builtin_ids() {
        let registry = BackendRegistry::builtin();
        assert_eq!(
            registry.resolve(BackendId::PORTABLE).unwrap().name(),
            "portable"
        );
        assert_eq!(
            registry.resolve(BackendId::ACCELERATED).unwrap().name(),
            "accelerated"
        );
    }

    #[test]
    fn test_resolve_unknown_id_fails() {
        let registry = BackendRegistry::builtin();
        match registry.resolve(BackendId(200)) {
            Err(EngineError::UnknownBackend(id)) => assert_eq!(id, BackendId(200)),
            other => panic!("expected UnknownBackend, got {:?}", other.map(|b| b.name())),
        }
    }

    #[test]
    fn test_pinned_id_always_honored() {
        let registry = BackendRegistry::builtin();
        // Pinning overrides the large-batch policy choice.
        let backend = registry
            .select(1_000_000, Some(BackendId::PORTABLE))
            .unwrap();
        assert_eq!(backend.id(), BackendId::PORTABLE);
    }

    #[test]
    fn test_pinned_unknown_id_never_falls_back() {
        let registry = BackendRegistry::builtin();
        assert!(registry.select(1, Some(BackendId(99))).is_err());
    }

    #[test]
    fn test_policy_threshold_selection() {
        let registry = BackendRegistry::with_policy(SelectionPolicy {
            batch_threshold: 100,
            small_batch: BackendId::PORTABLE,
            large_batch: BackendId::ACCELERATED,
        });

        assert_eq!(
            registry.select(1, None).unwrap().id(),
            BackendId::PORTABLE
        );
        assert_eq!(
            registry.select(99, None).unwrap().id(),
            BackendId::PORTABLE
        );
        assert_eq!(
            registry.select(100, None).unwrap().id(),
            BackendId::ACCELERATED
        );
    }
}
