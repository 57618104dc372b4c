pub mod moka_cache;

use itemstore::persistence::{DisabledItemStore, SledItemStore};
use itemstore::ports::{ItemCache, ItemRepository, StorageFactory};
use shared::config::Config;
use std::sync::Arc;
use tracing::info;

pub use moka_cache::MokaItemCache;

/// Builds the sled store and the moka cache, honouring the environment and
/// cache switches in the configuration
#[derive(Clone, Copy, Debug, Default)]
pub struct UnifiedStorageFactory;

impl StorageFactory for UnifiedStorageFactory {
    fn create_store(&self, config: &Config) -> Arc<dyn ItemRepository> {
        if config.store_enabled() {
            info!(path = %config.store.path().display(), "using sled backing store");
            Arc::new(SledItemStore::from_config(&config.store))
        } else {
            info!(
                environment = %config.environment,
                "backing store disabled for this environment"
            );
            Arc::new(DisabledItemStore::new(config.environment.clone()))
        }
    }

    fn create_cache(&self, config: &Config) -> Option<Arc<dyn ItemCache>> {
        if !config.cache.enabled {
            info!("cache layer disabled");
            return None;
        }
        info!(
            max_entries = config.cache.max_entries,
            ttl = ?config.cache.ttl,
            "using moka cache layer"
        );
        Some(Arc::new(MokaItemCache::from_settings(&config.cache)))
    }
}
