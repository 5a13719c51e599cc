use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use makhzan_core::{CounterStore, StoreError, parse_counter};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

type Counters = BTreeMap<String, String>;

/// Counters persisted as a flat JSON object on local disk.
///
/// Writes go to a sibling temp file that is renamed over the original. The
/// lock is process-local; separate processes sharing the file still race.
pub struct JsonFileCounterStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileCounterStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Storage(e.to_string()))?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Counters, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Counters::new()),
            Err(err) => return Err(StoreError::Storage(err.to_string())),
        };

        match serde_json::from_str(&raw) {
            Ok(counters) => Ok(counters),
            Err(err) => {
                warn!(path = %self.path.display(), "discarding unreadable counter file: {err}");
                Ok(Counters::new())
            }
        }
    }

    async fn save(&self, counters: &Counters) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(counters)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serialized)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CounterStore for JsonFileCounterStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut counters = self.load().await?;
        counters.insert(key.to_string(), value.to_string());
        self.save(&counters).await
    }

    async fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let _guard = self.lock.lock().await;
        let mut counters = self.load().await?;
        let next = parse_counter(counters.get(key).map(String::as_str)) + 1;
        counters.insert(key.to_string(), next.to_string());
        self.save(&counters).await?;
        Ok(next)
    }
}
