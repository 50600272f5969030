use std::fmt::Debug;
use std::marker::PhantomData;

use crate::context::{display_key, prefixed_key, Store, StoreError};
use crate::impls::{RevertibleStore, SharedStore};
use crate::utils::codec::{BinCodec, JsonCodec, ProtobufCodec};
use crate::utils::Codec;

pub type MainStore<S> = SharedStore<RevertibleStore<S>>;

/// A `TypedStore` that uses the `JsonCodec`
pub type JsonStore<S, V> = TypedStore<S, JsonCodec<V>>;

/// A `TypedStore` that uses the `ProtobufCodec`
pub type ProtobufStore<S, V, R> = TypedStore<S, ProtobufCodec<V, R>>;

/// A `TypedStore` that uses the `BinCodec`
pub type BinStore<S, V> = TypedStore<S, BinCodec<V>>;

/// A view over one prefixed partition of a store, holding values of a single type.
#[derive(Clone, Debug)]
pub struct TypedStore<S, C> {
    store: S,
    prefix: Vec<u8>,
    _codec: PhantomData<C>,
}

impl<S, C, V> TypedStore<S, C>
where
    S: Store,
    C: Codec<Value = V>,
{
    #[inline]
    pub fn new(store: S, prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            _codec: PhantomData,
        }
    }

    #[inline]
    fn key(&self, key: impl AsRef<[u8]>) -> Vec<u8> {
        prefixed_key(&self.prefix, key)
    }

    #[inline]
    pub fn set(&mut self, key: impl AsRef<[u8]>, value: &V) -> Result<Option<V>, StoreError> {
        let key = self.key(key);
        let encoded = C::encode(value).map_err(|reason| StoreError::Encode {
            key: display_key(&key),
            reason,
        })?;
        self.store
            .set(key, encoded)
            .map(|prev_val| prev_val.and_then(|v| C::decode(&v).ok()))
    }

    #[inline]
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> bool {
        let key = self.key(key);
        self.store.delete(&key).is_some()
    }

    #[inline]
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<V>, StoreError> {
        let key = self.key(key);
        self.store
            .get(&key)
            .map(|v| {
                C::decode(&v).map_err(|reason| StoreError::Decode {
                    key: display_key(&key),
                    reason,
                })
            })
            .transpose()
    }

    #[inline]
    pub fn has(&self, key: impl AsRef<[u8]>) -> bool {
        self.store.has(&self.key(key))
    }

    /// Returns every entry of the partition in key order, with the partition
    /// prefix stripped from the keys.
    pub fn entries(&self) -> Result<Vec<(Vec<u8>, V)>, StoreError> {
        self.store
            .prefix_iter(&self.prefix)
            .into_iter()
            .map(|(key, value)| {
                let value = C::decode(&value).map_err(|reason| StoreError::Decode {
                    key: display_key(&key),
                    reason,
                })?;
                Ok((key[self.prefix.len()..].to_vec(), value))
            })
            .collect()
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryStore;

    #[derive(Clone, PartialEq, ::prost::Message)]
    struct RawEntry {
        #[prost(string, tag = "1")]
        name: String,
        #[prost(uint64, tag = "2")]
        count: u64,
    }

    #[test]
    fn partitions_do_not_overlap() {
        let shared = SharedStore::new(InMemoryStore::default());
        let mut first: ProtobufStore<_, RawEntry, RawEntry> =
            TypedStore::new(shared.share(), [0x01]);
        let mut second: ProtobufStore<_, RawEntry, RawEntry> =
            TypedStore::new(shared.share(), [0x02]);

        let entry = RawEntry {
            name: "a".to_string(),
            count: 1,
        };
        first.set("a", &entry).unwrap();
        second
            .set(
                "a",
                &RawEntry {
                    name: "b".to_string(),
                    count: 2,
                },
            )
            .unwrap();

        assert_eq!(first.get("a").unwrap(), Some(entry));
        assert_eq!(first.entries().unwrap().len(), 1);
        assert_eq!(second.entries().unwrap()[0].0, b"a".to_vec());
    }

    #[test]
    fn undecodable_value_is_an_error() {
        let mut shared = SharedStore::new(InMemoryStore::default());
        shared.set(vec![0x01, b'k'], vec![0xff, 0xff]).unwrap();
        let typed: ProtobufStore<_, RawEntry, RawEntry> = TypedStore::new(shared, [0x01]);

        assert!(matches!(typed.get("k"), Err(StoreError::Decode { .. })));
    }
}
