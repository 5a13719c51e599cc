use std::path::PathBuf;

use anyhow::{Context, Result};
use makhzan_format::NumberFormat;

const DEFAULT_DATA_DIR: &str = "./data";
const COUNTER_FILE: &str = "counters.json";

#[derive(Clone, Debug)]
pub struct MakhzanConfig {
    pub database_url: Option<String>,
    pub redis_url: Option<String>,
    pub data_dir: PathBuf,
    pub number_format: NumberFormat,
}

impl MakhzanConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = non_empty("DATABASE_URL");
        let redis_url = non_empty("REDIS_URL");
        let data_dir = non_empty("MAKHZAN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let mut number_format = NumberFormat::default();
        if let Some(currency) = lookup("MAKHZAN_CURRENCY") {
            number_format.currency = currency;
        }
        if let Some(decimals) = non_empty("MAKHZAN_DECIMALS") {
            number_format.decimals = decimals.trim().parse::<u32>().with_context(|| {
                format!("MAKHZAN_DECIMALS must be a whole number, got {decimals:?}")
            })?;
        }

        Ok(Self {
            database_url,
            redis_url,
            data_dir,
            number_format,
        })
    }

    pub fn counter_file(&self) -> PathBuf {
        self.data_dir.join(COUNTER_FILE)
    }
}
