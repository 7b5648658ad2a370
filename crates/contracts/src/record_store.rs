//! RecordStore trait - durable keyed storage for pending events
//!
//! The store owns durability; everything the dispatcher holds is transient.

use bytes::Bytes;

use crate::ContractError;

/// One persisted record together with the key it was stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub key: String,
    pub bytes: Bytes,
}

impl StoredRecord {
    pub fn new(key: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            bytes: bytes.into(),
        }
    }
}

/// Keyed record storage
///
/// Every operation is atomic for a single key. Implementations must be
/// shareable across tasks.
#[trait_variant::make(RecordStore: Send)]
pub trait LocalRecordStore {
    /// Store name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Insert or overwrite the record under `key`
    async fn put(&self, key: &str, value: Bytes) -> Result<(), ContractError>;

    /// Snapshot of every stored record, in no particular order
    async fn get_all(&self) -> Result<Vec<StoredRecord>, ContractError>;

    /// Delete the record under `key`; missing keys are not an error
    async fn remove(&self, key: &str) -> Result<(), ContractError>;
}
