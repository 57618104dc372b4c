use async_trait::async_trait;
use itemstore::ports::ItemCache;
use moka::Expiry;
use moka::future::Cache;
use shared::config::CacheSettings;
use shared::{Error, Result};
use std::fmt::Debug;
use std::future::Future;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct CachedValue {
    value: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with
struct EntryTtl;

impl Expiry<String, CachedValue> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based item cache with per-entry TTL.
/// Every call is bounded by `timeout` and reports failure as `CacheUnavailable`.
pub struct MokaItemCache {
    cache: Cache<String, CachedValue>,
    timeout: Duration,
}

impl MokaItemCache {
    pub fn new(max_entries: u64, timeout: Duration) -> Self {
        let cache = Cache::builder()
            .name("items")
            .max_capacity(max_entries)
            .expire_after(EntryTtl)
            .build();

        Self { cache, timeout }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.max_entries, settings.timeout)
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    async fn bounded<T>(&self, op: impl Future<Output = T>) -> Result<T> {
        tokio::time::timeout(self.timeout, op).await.map_err(|_| {
            Error::CacheUnavailable(format!("cache call timed out after {:?}", self.timeout))
        })
    }
}

#[async_trait]
impl ItemCache for MokaItemCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = self.bounded(self.cache.get(key)).await?;
        Ok(entry.map(|cached| cached.value))
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.bounded(
            self.cache
                .insert(key.to_string(), CachedValue { value, ttl }),
        )
        .await
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

impl Debug for MokaItemCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaItemCache")
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .field("timeout", &self.timeout)
            .finish()
    }
}
