//! InMemoryRecordStore - process-local store, lost on exit

use bytes::Bytes;
use contracts::{ContractError, RecordStore, StoredRecord};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Store backed by a locked map
pub struct InMemoryRecordStore {
    name: String,
    records: RwLock<HashMap<String, Bytes>>,
}

impl InMemoryRecordStore {
    /// Create an empty store
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.read().contains_key(key)
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new("memory")
    }
}

impl RecordStore for InMemoryRecordStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), ContractError> {
        self.records.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<StoredRecord>, ContractError> {
        Ok(self
            .records
            .read()
            .iter()
            .map(|(key, bytes)| StoredRecord::new(key.clone(), bytes.clone()))
            .collect())
    }

    async fn remove(&self, key: &str) -> Result<(), ContractError> {
        self.records.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryRecordStore::default();
        store.put("a", Bytes::from_static(b"one")).await.unwrap();
        store.put("a", Bytes::from_static(b"two")).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all, vec![StoredRecord::new("a", Bytes::from_static(b"two"))]);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let store = InMemoryRecordStore::default();
        store.put("a", Bytes::from_static(b"x")).await.unwrap();
        store.remove("b").await.unwrap();
        store.remove("a").await.unwrap();
        store.remove("a").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_store_name() {
        let store = InMemoryRecordStore::new("pending");
        assert_eq!(store.name(), "pending");
    }
}
