use tracing::{error, trace};

use crate::context::{Store, StoreError};

/// Journals writes since the last [`apply`](Store::apply) so that
/// [`reset`](Store::reset) can undo them. Used to roll back a failed
/// transaction's writes.
#[derive(Clone, Debug)]
pub struct RevertibleStore<S> {
    store: S,
    /// Each touched key with the value it had before, oldest first.
    journal: Vec<(Vec<u8>, Option<Vec<u8>>)>,
}

impl<S: Store> RevertibleStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            journal: Vec::new(),
        }
    }
}

impl<S: Store + Default> Default for RevertibleStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Store> Store for RevertibleStore<S> {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError> {
        let previous = self.store.set(key.clone(), value)?;
        self.journal.push((key, previous.clone()));
        Ok(previous)
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.get(key)
    }

    fn delete(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        let previous = self.store.delete(key);
        if previous.is_some() {
            self.journal.push((key.to_vec(), previous.clone()));
        }
        previous
    }

    /// Forgets the journal. The inner store's `apply` is left alone so
    /// revertible layers can nest.
    fn apply(&mut self) -> Result<(), StoreError> {
        self.journal.clear();
        Ok(())
    }

    fn reset(&mut self) {
        trace!(writes = self.journal.len(), "reverting uncommitted writes");
        while let Some((key, previous)) = self.journal.pop() {
            match previous {
                None => {
                    self.store.delete(&key);
                }
                Some(value) => {
                    if let Err(e) = self.store.set(key, value) {
                        error!("failed to restore store entry: {e}");
                    }
                }
            }
        }
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.store.prefix_iter(prefix)
    }
}
