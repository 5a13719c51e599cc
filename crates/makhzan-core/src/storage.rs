use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreError;

pub const PRODUCTS: &str = "products";
pub const PURCHASE_INVOICES: &str = "purchase_invoices";
pub const PURCHASE_INVOICE_ITEMS: &str = "purchase_invoice_items";

/// The authoritative record store: named collections of JSON documents.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Inserts `record`, replacing any existing record with the same `id`.
    async fn upsert(&self, collection: &str, id: &str, record: Value) -> Result<(), StoreError>;
}

/// Key/value persistence for sequence counters.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Bumps the counter under `key` and returns the new value. Absent or
    /// unparseable values start from zero.
    ///
    /// The default is an unguarded read-modify-write; implementations that
    /// can serialize the update should override it.
    async fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let current = parse_counter(self.get(key).await?.as_deref());
        let next = current + 1;
        self.set(key, &next.to_string()).await?;
        Ok(next)
    }
}

/// Reads a persisted counter value; anything that is not a non-negative
/// integer counts as zero.
pub fn parse_counter(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok()).unwrap_or(0)
}

/// Loads a collection and decodes each record as `T`. Records that do not
/// decode are logged and skipped.
pub async fn fetch_records<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    let raw = store.fetch_all(collection).await?;
    let mut records = Vec::with_capacity(raw.len());

    for value in raw {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(err) => warn!(collection, "skipping malformed record: {err}"),
        }
    }

    Ok(records)
}
