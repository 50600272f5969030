use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub type SharedRw<T> = Arc<RwLock<T>>;

/// Lock access for stores shared between keepers.
///
/// A store holds no invariant spanning a panicking writer: every write is a
/// single map operation. A poisoned lock is therefore taken over as is.
pub trait SharedRwExt<T> {
    fn read_access(&self) -> RwLockReadGuard<'_, T>;
    fn write_access(&self) -> RwLockWriteGuard<'_, T>;
}

impl<T> SharedRwExt<T> for SharedRw<T> {
    fn read_access(&self) -> RwLockReadGuard<'_, T> {
        self.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_access(&self) -> RwLockWriteGuard<'_, T> {
        self.write().unwrap_or_else(PoisonError::into_inner)
    }
}
