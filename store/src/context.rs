use core::fmt::Debug;

use displaydoc::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// failed to encode value at key `{key}`: `{reason}`
    Encode { key: String, reason: String },
    /// failed to decode value at key `{key}`: `{reason}`
    Decode { key: String, reason: String },
    /// backend failure: `{description}`
    Backend { description: String },
}

impl std::error::Error for StoreError {}

/// Ordered byte-keyed store.
///
/// Keys are compared bytewise, so keepers lay out their partitions as a
/// one-byte prefix followed by the key material and iterate them in order.
pub trait Store: Clone + Debug + Send + Sync + 'static {
    /// Set `value` for `key`, returning the previous value
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<Option<Vec<u8>>, StoreError>;

    /// Get the value associated with `key`
    fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Delete `key`, returning the removed value
    fn delete(&mut self, key: &[u8]) -> Option<Vec<u8>>;

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Apply accumulated changes
    fn apply(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Reset accumulated changes
    fn reset(&mut self) {}

    /// Return all entries whose key starts with `prefix`, in key order
    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Vec<u8>, Vec<u8>)>;
}

/// Builds a store key from a partition prefix and the key material.
pub fn prefixed_key(prefix: &[u8], suffix: impl AsRef<[u8]>) -> Vec<u8> {
    let suffix = suffix.as_ref();
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix);
    key
}

pub(crate) fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
