//! The persistence seam: a synchronous key-value contract over opaque JSON
//! blobs, one read or write per state transition, last-writer-wins.

use std::collections::HashMap;

/// Which per-user blob a call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Ranges,
    Performance,
}

/// Reserved user name under which the shared (default) ranges live.
pub const DEFAULT_RANGES_USER: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage rejected the write: {0}")]
    WriteRejected(String),
}

/// External persistence provider. Each `put` fully overwrites the prior
/// blob for `(user, kind)`; concurrent writers race and the last one wins.
pub trait StateStore {
    fn get(&self, user: &str, kind: StorageKind) -> Result<Option<String>, StoreError>;
    fn put(&mut self, user: &str, kind: StorageKind, blob: &str) -> Result<(), StoreError>;
}

impl<T: StateStore + ?Sized> StateStore for &mut T {
    fn get(&self, user: &str, kind: StorageKind) -> Result<Option<String>, StoreError> {
        (**self).get(user, kind)
    }

    fn put(&mut self, user: &str, kind: StorageKind, blob: &str) -> Result<(), StoreError> {
        (**self).put(user, kind, blob)
    }
}

/// In-memory store for tests, demos, and session-local fallback.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<(String, StorageKind), String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, user: &str, kind: StorageKind) -> Result<Option<String>, StoreError> {
        Ok(self.blobs.get(&(user.to_string(), kind)).cloned())
    }

    fn put(&mut self, user: &str, kind: StorageKind, blob: &str) -> Result<(), StoreError> {
        self.blobs
            .insert((user.to_string(), kind), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_and_overwrites() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("ana", StorageKind::Ranges).unwrap(), None);

        store.put("ana", StorageKind::Ranges, "{}").unwrap();
        store.put("ana", StorageKind::Ranges, r#"{"version":2}"#).unwrap();
        assert_eq!(
            store.get("ana", StorageKind::Ranges).unwrap().as_deref(),
            Some(r#"{"version":2}"#)
        );

        // Kinds are independent slots.
        assert_eq!(store.get("ana", StorageKind::Performance).unwrap(), None);
    }
}
