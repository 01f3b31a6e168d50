use std::sync::{Arc, PoisonError, RwLock};

use crate::model::Model;

/// Process-wide holder of the current model. The lock guards only the
/// reference read/swap; models are built off to the side and installed whole,
/// so readers never see a partial rebuild and concurrent trainers never write
/// into the same model.
#[derive(Debug, Default)]
pub struct ModelStore {
    current: RwLock<Option<Arc<Model>>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// The installed model, if any. A poisoned lock still holds a coherent
    /// `Option<Arc<_>>` (swaps are single assignments), so recover instead of
    /// panicking.
    pub fn current(&self) -> Option<Arc<Model>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the installed model atomically and returns the shared handle.
    pub fn install(&self, model: Model) -> Arc<Model> {
        let model = Arc::new(model);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(model.clone());
        model
    }

    /// Discards the installed model, returning the store to its empty state.
    pub fn reset(&self) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_trained(&self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::GermanVendorMatcher;

    fn empty_model() -> Model {
        Model::train(&[], &GermanVendorMatcher)
    }

    #[test]
    fn starts_empty() {
        let store = ModelStore::new();
        assert!(store.current().is_none());
        assert!(!store.is_trained());
    }

    #[test]
    fn install_replaces_whole_model() {
        let store = ModelStore::new();
        let first = store.install(empty_model());
        let second = store.install(empty_model());
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&store.current().unwrap(), &second));
    }

    #[test]
    fn reset_returns_to_empty() {
        let store = ModelStore::new();
        store.install(empty_model());
        store.reset();
        assert!(store.current().is_none());
    }

    #[test]
    fn readers_hold_their_snapshot_across_a_swap() {
        let store = ModelStore::new();
        let snapshot = store.install(empty_model());
        store.install(empty_model());
        // The old handle stays valid and untouched after the swap.
        assert_eq!(snapshot.total_records(), 0);
    }

    #[test]
    fn concurrent_readers_and_installs() {
        let store = Arc::new(ModelStore::new());
        store.install(empty_model());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    for _ in 0..100 {
                        // Every observed reference is a complete model.
                        if let Some(model) = store.current() {
                            assert_eq!(model.total_records(), 0);
                        }
                    }
                });
            }
            let writer = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..20 {
                    writer.install(empty_model());
                }
            });
        });
    }
}
