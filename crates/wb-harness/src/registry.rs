//! Registry of fake backend instances constructed during a session.
//!
//! The orchestrator hands a registry into the worker at spawn time; every
//! [`FakeBackend`](crate::FakeBackend) registers its instance handle at
//! construction. Tests later drain the registry to assert on what was
//! actually constructed, in construction order.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::fake::FakeInstance;

/// Ordered collection of constructed fake instances.
///
/// Explicitly shared between orchestrator and worker; nothing is keyed off
/// ambient thread identity.
#[derive(Debug, Clone, Default)]
pub struct InstanceRegistry {
    entries: Arc<Mutex<Vec<FakeInstance>>>,
}

impl InstanceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a newly constructed instance.
    pub fn register(&self, instance: FakeInstance) {
        self.entries.lock().push(instance);
    }

    /// Removes and returns all registered instances, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<FakeInstance> {
        std::mem::take(&mut *self.entries.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_registration_order_and_empties() {
        let registry = InstanceRegistry::new();
        registry.register(FakeInstance::new(0));
        registry.register(FakeInstance::new(1));

        let drained = registry.drain();
        let ids: Vec<usize> = drained.iter().map(FakeInstance::id).collect();
        assert_eq!(ids, [0, 1]);
        assert!(registry.drain().is_empty());
    }
}
