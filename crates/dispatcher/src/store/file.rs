//! FileRecordStore - one file per record, survives restarts
//!
//! Filename is the record key, contents are the raw record bytes. Writes
//! land in a hidden temp file first and are renamed into place, so
//! `get_all` never observes a partial record.

use bytes::Bytes;
use contracts::{ContractError, RecordStore, StoredRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, instrument, warn};

const TEMP_PREFIX: char = '.';
const TEMP_SUFFIX: &str = ".tmp";

/// Store that keeps each record in its own file under `dir`
pub struct FileRecordStore {
    name: String,
    dir: PathBuf,
    temp_seq: AtomicU64,
}

impl FileRecordStore {
    /// Open (creating if needed) a store rooted at `dir`
    ///
    /// Temp files left by a write that never reached its rename are deleted,
    /// so only one store should be opened per directory at a time.
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let store = Self {
            name: name.into(),
            dir,
            temp_seq: AtomicU64::new(0),
        };
        store.sweep_stale_temps()?;
        Ok(store)
    }

    fn sweep_stale_temps(&self) -> std::io::Result<()> {
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if !name.starts_with(TEMP_PREFIX) || !name.ends_with(TEMP_SUFFIX) {
                continue;
            }
            if !entry.file_type()?.is_file() {
                continue;
            }
            match std::fs::remove_file(entry.path()) {
                Ok(()) => debug!(store = %self.name, file = %name, "Removed stale temp file"),
                Err(e) => warn!(
                    store = %self.name,
                    file = %name,
                    error = %e,
                    "Failed to remove stale temp file"
                ),
            }
        }
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys become filenames, so anything that could escape `dir` or
    /// collide with temp files is refused
    fn record_path(&self, key: &str) -> Result<PathBuf, ContractError> {
        let valid = !key.is_empty()
            && !key.starts_with(TEMP_PREFIX)
            && !key.contains(['/', '\\', '\0']);
        if valid {
            Ok(self.dir.join(key))
        } else {
            Err(ContractError::store(
                &self.name,
                format!("invalid record key '{key}'"),
            ))
        }
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!("{TEMP_PREFIX}{key}.{seq}{TEMP_SUFFIX}"))
    }

    fn io_error(&self, action: &str, key: &str, e: std::io::Error) -> ContractError {
        ContractError::store(&self.name, format!("{action} '{key}': {e}"))
    }
}

impl RecordStore for FileRecordStore {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "file_store_put",
        skip(self, value),
        fields(store = %self.name, bytes = value.len())
    )]
    async fn put(&self, key: &str, value: Bytes) -> Result<(), ContractError> {
        let path = self.record_path(key)?;
        let temp = self.temp_path(key);

        if let Err(e) = fs::write(&temp, &value).await {
            return Err(self.io_error("write", key, e));
        }
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(self.io_error("rename", key, e));
        }

        debug!(store = %self.name, key, "Record written");
        Ok(())
    }

    #[instrument(name = "file_store_get_all", skip(self), fields(store = %self.name))]
    async fn get_all(&self) -> Result<Vec<StoredRecord>, ContractError> {
        let mut entries = fs::read_dir(&self.dir).await?;
        let mut records = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Ok(key) = entry.file_name().into_string() else {
                warn!(store = %self.name, path = ?entry.path(), "Skipping non UTF-8 filename");
                continue;
            };
            if key.starts_with(TEMP_PREFIX) || !entry.file_type().await?.is_file() {
                continue;
            }

            match fs::read(entry.path()).await {
                Ok(bytes) => records.push(StoredRecord::new(key, bytes)),
                // Removed by a concurrent flush after listing
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(self.io_error("read", &key, e)),
            }
        }

        debug!(store = %self.name, records = records.len(), "Records loaded");
        Ok(records)
    }

    #[instrument(name = "file_store_remove", skip(self), fields(store = %self.name))]
    async fn remove(&self, key: &str) -> Result<(), ContractError> {
        let path = self.record_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error("remove", key, e)),
        }
    }
}
