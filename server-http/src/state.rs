use itemstore::ItemService;
use shared::config::Config;
use std::sync::Arc;
use storage_engine::UnifiedStorageFactory;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub items: Arc<ItemService>,
}

impl AppState {
    pub fn new(items: Arc<ItemService>) -> Self {
        Self { items }
    }

    /// Build the item service over the sled store and moka cache
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(ItemService::from_config(
            config,
            &UnifiedStorageFactory,
        )))
    }
}
