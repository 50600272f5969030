use std::collections::BTreeMap;

use tracing::trace;

use crate::context::{display_key, Store, StoreError};

/// An in-memory store backed by an ordered map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    state: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryStore {
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl Store for InMemoryStore {
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError> {
        trace!("set at key = {}", display_key(&key));
        Ok(self.state.insert(key, value))
    }

    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        trace!("get at key = {}", display_key(key));
        self.state.get(key).cloned()
    }

    fn delete(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        trace!("delete at key = {}", display_key(key));
        self.state.remove(key)
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.state
            .range(prefix.to_vec()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_iteration_is_ordered_and_bounded() {
        let mut store = InMemoryStore::default();
        store.set(b"\x02b".to_vec(), b"2".to_vec()).unwrap();
        store.set(b"\x01z".to_vec(), b"0".to_vec()).unwrap();
        store.set(b"\x02a".to_vec(), b"1".to_vec()).unwrap();
        store.set(b"\x03a".to_vec(), b"3".to_vec()).unwrap();

        let entries = store.prefix_iter(b"\x02");

        assert_eq!(
            entries,
            vec![
                (b"\x02a".to_vec(), b"1".to_vec()),
                (b"\x02b".to_vec(), b"2".to_vec()),
            ]
        );
    }

    #[test]
    fn delete_returns_removed_value() {
        let mut store = InMemoryStore::default();
        store.set(b"k".to_vec(), b"v".to_vec()).unwrap();

        assert_eq!(store.delete(b"k"), Some(b"v".to_vec()));
        assert_eq!(store.delete(b"k"), None);
        assert!(store.is_empty());
    }
}
