use std::sync::Arc;

use anyhow::{Context, Result};
use makhzan_core::{CounterStore, RecordStore};
use makhzan_sequence::{InvoiceNumberGenerator, ProductCodeGenerator};
use makhzan_store::JsonFileCounterStore;
use tracing::{info, warn};

use crate::config::MakhzanConfig;
use crate::db::{PgRecordStore, connect_database};
use crate::redis_counters::RedisCounterStore;

/// The record store and counter store a running application shares.
#[derive(Clone)]
pub struct Stores {
    pub records: Option<Arc<dyn RecordStore>>,
    pub counters: Arc<dyn CounterStore>,
}

impl Stores {
    pub fn product_codes(&self) -> ProductCodeGenerator {
        ProductCodeGenerator::new(self.records.clone(), Arc::clone(&self.counters))
    }

    pub fn invoice_numbers(&self) -> InvoiceNumberGenerator {
        InvoiceNumberGenerator::new(Arc::clone(&self.counters))
    }
}

/// Opens the stores named by `config`.
///
/// An unreachable database is not fatal: the application runs without a
/// record store and product codes come from the local counter.
pub async fn open_stores(config: &MakhzanConfig) -> Result<Stores> {
    let records = match &config.database_url {
        Some(url) => match open_record_store(url).await {
            Ok(store) => {
                info!("record store: postgres");
                Some(Arc::new(store) as Arc<dyn RecordStore>)
            }
            Err(err) => {
                warn!("record store unavailable, continuing without it: {err:#}");
                None
            }
        },
        None => None,
    };

    let counters: Arc<dyn CounterStore> = match &config.redis_url {
        Some(url) => {
            info!("counter store: redis");
            Arc::new(RedisCounterStore::connect(url).context("invalid REDIS_URL")?)
        }
        None => {
            let path = config.counter_file();
            info!(path = %path.display(), "counter store: local file");
            Arc::new(
                JsonFileCounterStore::open(&path)
                    .await
                    .with_context(|| format!("cannot open counter file {}", path.display()))?,
            )
        }
    };

    Ok(Stores { records, counters })
}

async fn open_record_store(database_url: &str) -> Result<PgRecordStore> {
    let pool = connect_database(database_url).await?;
    let store = PgRecordStore::new(pool);
    store.ensure_schema().await?;
    Ok(store)
}
