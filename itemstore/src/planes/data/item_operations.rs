use crate::domain::response::{ReadResponse, StatusReport, WriteResponse};
use crate::domain::{
    DependencyStatus, InitState, Item, ItemId, Source, cache_key, validate_id,
};
use crate::planes::control::Initializer;
use crate::planes::data::operation::ItemOperations;
use crate::ports::{ItemCache, ItemRepository, StorageFactory};
use async_trait::async_trait;
use shared::config::Config;
use shared::{Error, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct ServiceSettings {
    pub environment: String,
    pub cache_ttl: Duration,
    pub cache_timeout: Duration,
    pub init_timeout: Duration,
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            environment: config.environment.clone(),
            cache_ttl: config.cache.ttl,
            cache_timeout: config.cache.timeout,
            init_timeout: config.init.attempt_timeout,
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Cache-aside item service.
///
/// Reads prefer the cache and fall back to the store; writes always go to the
/// store first. The cache is only ever populated from a value the store just
/// returned or accepted. Every cache call is bounded by `cache_timeout`, and a
/// failed or slow cache call is treated as a miss.
pub struct ItemService {
    repository: Arc<dyn ItemRepository>,
    cache: Option<Arc<dyn ItemCache>>,
    initializer: Initializer,
    settings: ServiceSettings,
}

impl ItemService {
    pub fn new(
        repository: Arc<dyn ItemRepository>,
        cache: Option<Arc<dyn ItemCache>>,
        settings: ServiceSettings,
    ) -> Self {
        let initializer = Initializer::new(repository.clone(), settings.init_timeout);
        Self {
            repository,
            cache,
            initializer,
            settings,
        }
    }

    pub fn from_config(config: &Config, factory: &dyn StorageFactory) -> Self {
        Self::new(
            factory.create_store(config),
            factory.create_cache(config),
            ServiceSettings::from_config(config),
        )
    }

    pub fn initializer(&self) -> &Initializer {
        &self.initializer
    }

    pub fn environment(&self) -> &str {
        &self.settings.environment
    }

    async fn bounded_cache_call<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        let limit = self.settings.cache_timeout;
        tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(Error::CacheUnavailable(format!(
                "cache call timed out after {:?}",
                limit
            )))
        })
    }

    /// Cache lookup where every failure counts as a miss
    async fn cached_value(&self, key: &str) -> Option<String> {
        let cache = self.cache.as_ref()?;
        match self.bounded_cache_call(cache.get(key)).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(key, error = %e, "cache lookup failed, falling back to store");
                None
            }
        }
    }

    async fn populate_cache(&self, item: &Item) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let key = item.cache_key();
        let set = cache.set_with_ttl(&key, item.value.clone(), self.settings.cache_ttl);
        if let Err(e) = self.bounded_cache_call(set).await {
            warn!(key, error = %e, "cache population failed");
        }
    }
}

#[async_trait]
impl ItemOperations for ItemService {
    async fn read(&self, id: ItemId) -> Result<Option<ReadResponse>> {
        validate_id(id)?;

        // Hits never wait on the store, initialized or not
        let key = cache_key(id);
        if let Some(value) = self.cached_value(&key).await {
            debug!(id, "cache hit");
            return Ok(Some(ReadResponse::new(Item { id, value }, Source::Cache)));
        }

        self.initializer.ensure_ready().await?;

        match self.repository.get(id).await? {
            Some(item) => {
                debug!(id, "cache miss, served from store");
                self.populate_cache(&item).await;
                Ok(Some(ReadResponse::new(item, Source::Store)))
            }
            None => {
                debug!(id, "item not found");
                Ok(None)
            }
        }
    }

    async fn write(&self, id: ItemId, value: String) -> Result<WriteResponse> {
        let item = Item::new(id, value)?;
        self.initializer.ensure_ready().await?;

        let outcome = self.repository.put(item).await?;
        // Overwrite rather than invalidate, so the entry reflects this write
        self.populate_cache(&outcome.item).await;
        info!(id, action = ?outcome.action, "item written");

        Ok(WriteResponse {
            item: outcome.item,
            source: Source::Store,
            action: outcome.action,
        })
    }

    async fn status(&self) -> StatusReport {
        let store = async {
            if !self.repository.is_enabled() {
                return DependencyStatus::Disabled;
            }
            match self.repository.ping().await {
                Ok(()) => DependencyStatus::Connected,
                Err(e) => {
                    warn!(error = %e, "store ping failed");
                    DependencyStatus::Unavailable
                }
            }
        };
        let cache = async {
            let Some(cache) = self.cache.as_ref() else {
                return DependencyStatus::Disabled;
            };
            match self.bounded_cache_call(cache.ping()).await {
                Ok(()) => DependencyStatus::Connected,
                Err(e) => {
                    warn!(error = %e, "cache ping failed");
                    DependencyStatus::Unavailable
                }
            }
        };
        let (store, cache) = tokio::join!(store, cache);

        StatusReport {
            environment: self.settings.environment.clone(),
            store,
            cache,
            initialized: self.initializer.state() == InitState::Ready,
        }
    }
}

impl std::fmt::Debug for ItemService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemService")
            .field("initializer", &self.initializer)
            .field("cache_enabled", &self.cache.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}
