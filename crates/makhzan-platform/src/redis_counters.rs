use anyhow::Result;
use async_trait::async_trait;
use makhzan_core::{CounterStore, StoreError};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError, Script};
use tracing::warn;

const KEY_PREFIX: &str = "makhzan:counter:";

// Runs server-side so the check and the reset happen as one step. A value
// another writer repaired in the meantime is incremented, not clobbered.
const RESET_UNPARSEABLE: &str = r"
local current = redis.call('GET', KEYS[1])
if current and string.match(current, '^%d+$') then
    return redis.call('INCR', KEYS[1])
end
redis.call('SET', KEYS[1], '1')
return 1
";

/// Counters kept in Redis. `increment` is a single `INCR`, so every caller
/// sharing the server gets a distinct value. A key holding something other
/// than an integer restarts at 1 instead of failing.
#[derive(Clone)]
pub struct RedisCounterStore {
    client: Client,
}

impl RedisCounterStore {
    pub fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection().await?;
        connection.get(counter_key(key)).await.map_err(redis_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut connection = self.connection().await?;
        connection
            .set::<_, _, ()>(counter_key(key), value)
            .await
            .map_err(redis_error)
    }

    async fn increment(&self, key: &str) -> Result<u64, StoreError> {
        let key = counter_key(key);
        let mut connection = self.connection().await?;
        match connection.incr(&key, 1u64).await {
            Ok(next) => Ok(next),
            Err(err) if is_unparseable_counter(&err) => {
                warn!(key = %key, "counter held a non-integer value, restarting at 1");
                Script::new(RESET_UNPARSEABLE)
                    .key(&key)
                    .invoke_async(&mut connection)
                    .await
                    .map_err(redis_error)
            }
            Err(err) => Err(redis_error(err)),
        }
    }
}

fn counter_key(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// True when `INCR` was refused because the stored value is not an integer.
fn is_unparseable_counter(err: &RedisError) -> bool {
    err.detail()
        .map(str::to_owned)
        .unwrap_or_else(|| err.to_string())
        .contains("not an integer")
}

fn redis_error(err: RedisError) -> StoreError {
    if err.is_connection_dropped() || err.is_io_error() || err.is_timeout() {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Storage(err.to_string())
    }
}
