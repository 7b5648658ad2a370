//! Record store implementations
//!
//! Contains InMemoryRecordStore and FileRecordStore.

mod file;
mod memory;

pub use self::file::FileRecordStore;
pub use self::memory::InMemoryRecordStore;

use bytes::Bytes;
use contracts::{ContractError, RecordStore, StoreConfig, StoreKind, StoredRecord};

use crate::error::DispatcherError;

/// Whichever store the configuration selected
pub enum ConfiguredStore {
    Memory(InMemoryRecordStore),
    File(FileRecordStore),
}

impl ConfiguredStore {
    /// Build the store described by `config`
    pub fn from_config(config: &StoreConfig) -> Result<Self, DispatcherError> {
        match config.kind {
            StoreKind::Memory => Ok(Self::Memory(InMemoryRecordStore::default())),
            StoreKind::File => {
                let path = config
                    .path
                    .as_ref()
                    .ok_or_else(|| DispatcherError::setup("file store", "missing 'path'"))?;
                let store = FileRecordStore::new("file", path)
                    .map_err(|e| DispatcherError::setup("file store", e.to_string()))?;
                Ok(Self::File(store))
            }
        }
    }
}

impl RecordStore for ConfiguredStore {
    fn name(&self) -> &str {
        match self {
            Self::Memory(store) => store.name(),
            Self::File(store) => store.name(),
        }
    }

    async fn put(&self, key: &str, value: Bytes) -> Result<(), ContractError> {
        match self {
            Self::Memory(store) => store.put(key, value).await,
            Self::File(store) => store.put(key, value).await,
        }
    }

    async fn get_all(&self) -> Result<Vec<StoredRecord>, ContractError> {
        match self {
            Self::Memory(store) => store.get_all().await,
            Self::File(store) => store.get_all().await,
        }
    }

    async fn remove(&self, key: &str) -> Result<(), ContractError> {
        match self {
            Self::Memory(store) => store.remove(key).await,
            Self::File(store) => store.remove(key).await,
        }
    }
}
