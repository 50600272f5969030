use std::sync::{Arc, RwLock};

use crate::context::{Store, StoreError};
use crate::utils::{SharedRw, SharedRwExt};

/// A store several keepers hold at once. Handles made with
/// [`share`](Self::share) read and write the same underlying state.
#[derive(Clone, Debug)]
pub struct SharedStore<S>(SharedRw<S>);

impl<S> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    pub fn share(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S: Store + Default> Default for SharedStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Store> Store for SharedStore<S> {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError> {
        self.0.write_access().set(key, value)
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.0.read_access().get(key)
    }

    fn delete(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.0.write_access().delete(key)
    }

    fn apply(&mut self) -> Result<(), StoreError> {
        self.0.write_access().apply()
    }

    fn reset(&mut self) {
        self.0.write_access().reset()
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.0.read_access().prefix_iter(prefix)
    }
}
