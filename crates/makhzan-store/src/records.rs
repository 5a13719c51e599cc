use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use makhzan_core::{RecordId, RecordStore, StoreError};
use serde_json::Value;
use tokio::sync::RwLock;

/// Record store held in process memory. Collections keep insertion order.
#[derive(Default)]
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    offline: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the store unreachable; every call fails until it is brought
    /// back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("record store is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.ensure_online()?;
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn upsert(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let records = collections.entry(collection.to_string()).or_default();

        let existing = records
            .iter_mut()
            .find(|stored| stored_id(stored).is_some_and(|found| found.as_str() == id));
        match existing {
            Some(stored) => *stored = record,
            None => records.push(record),
        }

        Ok(())
    }
}

fn stored_id(record: &Value) -> Option<RecordId> {
    record
        .get("id")
        .and_then(|id| serde_json::from_value(id.clone()).ok())
}
