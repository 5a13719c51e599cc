use std::sync::Arc;

use makhzan_core::{CounterStore, PRODUCTS, RecordStore, StoreError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SequenceError;

pub const PRODUCT_CODE_PREFIX: &str = "PRD-";
pub const PRODUCT_CODE_COUNTER_KEY: &str = "product_code_counter";

/// Issues `PRD-NNNNN` product codes.
///
/// When a record store is attached, the next code follows the highest code
/// already stored; the caller must persist each new product before asking
/// for another code. Without a store, or when the store fails, a local
/// counter is bumped instead.
pub struct ProductCodeGenerator {
    records: Option<Arc<dyn RecordStore>>,
    counters: Arc<dyn CounterStore>,
}

impl ProductCodeGenerator {
    pub fn new(records: Option<Arc<dyn RecordStore>>, counters: Arc<dyn CounterStore>) -> Self {
        Self { records, counters }
    }

    pub fn local(counters: Arc<dyn CounterStore>) -> Self {
        Self::new(None, counters)
    }

    pub async fn generate(&self) -> Result<String, SequenceError> {
        let next = match &self.records {
            Some(records) => match next_from_records(records.as_ref()).await {
                Ok(next) => next,
                Err(err) => {
                    warn!("product scan failed, using local counter: {err}");
                    self.counters.increment(PRODUCT_CODE_COUNTER_KEY).await?
                }
            },
            None => self.counters.increment(PRODUCT_CODE_COUNTER_KEY).await?,
        };

        let code = format_product_code(next);
        debug!(code = %code, "issued product code");
        Ok(code)
    }
}

pub fn format_product_code(sequence: u64) -> String {
    format!("{PRODUCT_CODE_PREFIX}{sequence:05}")
}

/// Sequence number carried by a product code; zero for anything that is not
/// a `PRD-` code with a numeric suffix.
pub fn code_sequence(code: &str) -> u64 {
    let Some(suffix) = code.strip_prefix(PRODUCT_CODE_PREFIX) else {
        return 0;
    };
    let digits: String = suffix.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

async fn next_from_records(store: &dyn RecordStore) -> Result<u64, StoreError> {
    let products = store.fetch_all(PRODUCTS).await?;
    let highest = products
        .iter()
        .filter_map(|product| product.get("code").and_then(Value::as_str))
        .map(code_sequence)
        .max()
        .unwrap_or(0);
    Ok(highest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use makhzan_store::{InMemoryCounterStore, InMemoryRecordStore};
    use serde_json::json;

    async fn store_with_codes(codes: &[&str]) -> Arc<InMemoryRecordStore> {
        let store = Arc::new(InMemoryRecordStore::new());
        for (i, code) in codes.iter().enumerate() {
            let id = format!("p{i}");
            store
                .upsert(PRODUCTS, &id, json!({ "id": &id, "code": code }))
                .await
                .unwrap();
        }
        store
    }

    fn generator(records: Arc<InMemoryRecordStore>) -> ProductCodeGenerator {
        ProductCodeGenerator::new(
            Some(records as Arc<dyn RecordStore>),
            Arc::new(InMemoryCounterStore::new()),
        )
    }

    #[tokio::test]
    async fn next_code_follows_highest_existing() {
        let records = store_with_codes(&["PRD-00001", "PRD-00005", "PRD-00003"]).await;

        assert_eq!(generator(records).generate().await.unwrap(), "PRD-00006");
    }

    #[tokio::test]
    async fn foreign_codes_are_ignored() {
        let records = store_with_codes(&["PRD-00001", "OLD-001", "PRD-00003"]).await;

        assert_eq!(generator(records).generate().await.unwrap(), "PRD-00004");
    }

    #[tokio::test]
    async fn empty_catalog_starts_at_one() {
        let records = store_with_codes(&[]).await;

        assert_eq!(generator(records).generate().await.unwrap(), "PRD-00001");
    }

    #[tokio::test]
    async fn products_without_codes_count_as_zero() {
        let records = store_with_codes(&["PRD-00002"]).await;
        records
            .upsert(PRODUCTS, "bare", json!({ "id": "bare" }))
            .await
            .unwrap();
        records
            .upsert(PRODUCTS, "odd", json!({ "id": "odd", "code": 17 }))
            .await
            .unwrap();

        assert_eq!(generator(records).generate().await.unwrap(), "PRD-00003");
    }

    #[tokio::test]
    async fn persisted_products_advance_the_sequence() {
        let records = store_with_codes(&[]).await;
        let generator = generator(Arc::clone(&records));

        let first = generator.generate().await.unwrap();
        records
            .upsert(PRODUCTS, "new", json!({ "id": "new", "code": &first }))
            .await
            .unwrap();
        let second = generator.generate().await.unwrap();

        assert_eq!(first, "PRD-00001");
        assert_eq!(second, "PRD-00002");
    }

    #[tokio::test]
    async fn unreachable_store_falls_back_to_local_counter() {
        let records = store_with_codes(&["PRD-00040"]).await;
        records.set_offline(true);
        let counters = Arc::new(InMemoryCounterStore::new());
        counters.set(PRODUCT_CODE_COUNTER_KEY, "7").await.unwrap();
        let generator = ProductCodeGenerator::new(
            Some(records as Arc<dyn RecordStore>),
            counters.clone(),
        );

        assert_eq!(generator.generate().await.unwrap(), "PRD-00008");
        assert_eq!(generator.generate().await.unwrap(), "PRD-00009");
        assert_eq!(
            counters.get(PRODUCT_CODE_COUNTER_KEY).await.unwrap().as_deref(),
            Some("9")
        );
    }

    #[tokio::test]
    async fn local_generator_counts_from_one() {
        let generator = ProductCodeGenerator::local(Arc::new(InMemoryCounterStore::new()));

        assert_eq!(generator.generate().await.unwrap(), "PRD-00001");
        assert_eq!(generator.generate().await.unwrap(), "PRD-00002");
    }

    #[tokio::test]
    async fn wide_sequences_overflow_the_padding() {
        let records = store_with_codes(&["PRD-99999"]).await;

        assert_eq!(generator(records).generate().await.unwrap(), "PRD-100000");
    }

    #[test]
    fn code_sequence_reads_leading_digits() {
        assert_eq!(code_sequence("PRD-00012"), 12);
        assert_eq!(code_sequence("PRD-7x"), 7);
        assert_eq!(code_sequence("PRD-"), 0);
        assert_eq!(code_sequence("PRD-abc"), 0);
        assert_eq!(code_sequence("OLD-001"), 0);
    }
}
