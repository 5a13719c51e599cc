pub mod config;
pub mod db;
pub mod redis_counters;
pub mod stores;

pub use config::MakhzanConfig;
pub use db::{PgRecordStore, connect_database};
pub use redis_counters::RedisCounterStore;
pub use stores::{Stores, open_stores};
