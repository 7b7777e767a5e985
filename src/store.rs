use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

use crate::record::UserRecord;

/// Failures a record store can surface
///
/// Handlers convert every variant into an inline message on the page; none
/// of them is fatal to the render cycle.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Missing/invalid credentials or unreachable service
    #[error("connection failed: {0}")]
    Connection(String),

    /// Transport or permission failure while appending a row
    #[error("write failed: {0}")]
    Write(String),

    /// Transport or permission failure while reading the table
    #[error("read failed: {0}")]
    Read(String),
}

/// Append-only store of submitted records
///
/// Implementations keep insertion order and never mutate or remove rows.
/// The connect step is each implementation's constructor; the constructed
/// client is injected into the web state by the process entry point.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Write one record to the end of the table
    async fn append(&self, record: &UserRecord) -> Result<(), StoreError>;

    /// Return every stored record, in insertion order
    ///
    /// The whole table is re-fetched on every call; there is no pagination
    /// and no caching.
    async fn load_all(&self) -> Result<Vec<UserRecord>, StoreError>;
}

/// In-process store used when no sheet credentials are configured, and by
/// tests. Records live only as long as the process.
pub struct MemoryStore {
    records: Mutex<Vec<UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn append(&self, record: &UserRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        records.push(record.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Genre;

    #[tokio::test]
    async fn append_then_load_preserves_count_order_and_fields() {
        let store = MemoryStore::new();

        let submitted = vec![
            UserRecord::new("Ada", 30, Genre::SciFi),
            UserRecord::new("Grace", 40, Genre::Animation),
            UserRecord::new("Ada", 30, Genre::SciFi), // duplicates accumulate
        ];

        for record in &submitted {
            store.append(record).await.unwrap();
        }

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, submitted);
    }

    #[tokio::test]
    async fn empty_store_loads_empty() {
        let store = MemoryStore::new();
        assert!(store.load_all().await.unwrap().is_empty());
    }
}
