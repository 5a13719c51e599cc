use std::collections::HashMap;

use async_trait::async_trait;
use makhzan_core::{CounterStore, StoreError, parse_counter};
use tokio::sync::Mutex;

/// Counter store held in process memory. `increment` runs under one lock,
/// so concurrent callers never observe the same value.
#[derive(Default)]
pub struct InMemoryCounterStore {
    values: Mutex<HashMap<String, String>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let mut values = self.values.lock().await;
        let next = parse_counter(values.get(key).map(String::as_str)) + 1;
        values.insert(key.to_string(), next.to_string());
        Ok(next)
    }
}
