use crate::domain::response::{PutOutcome, SchemaReport};
use crate::domain::{Item, ItemId};
use async_trait::async_trait;
use shared::Result;
use shared::config::Config;
use std::sync::Arc;
use std::time::Duration;

// Ports are the pluggable extension points for the store and cache implementations

/// Port for building the store and cache from configuration
pub trait StorageFactory: Send + Sync + 'static {
    fn create_store(&self, config: &Config) -> Arc<dyn ItemRepository>;

    /// `None` when the cache layer is switched off
    fn create_cache(&self, config: &Config) -> Option<Arc<dyn ItemCache>>;
}

/// Port for the authoritative item store
#[async_trait]
pub trait ItemRepository: Send + Sync + 'static {
    /// `Ok(None)` means the item does not exist
    async fn get(&self, id: ItemId) -> Result<Option<Item>>;

    /// Insert or overwrite atomically
    async fn put(&self, item: Item) -> Result<PutOutcome>;

    /// Create the item table and insert the seed rows if they were never inserted
    async fn ensure_schema(&self) -> Result<SchemaReport>;

    /// Check connectivity without touching data
    async fn ping(&self) -> Result<()>;

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Port for the best-effort TTL cache. Every error is `Error::CacheUnavailable`.
#[async_trait]
pub trait ItemCache: Send + Sync + 'static {
    /// `Ok(None)` is a miss
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}
