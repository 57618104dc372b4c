use crate::domain::response::{PutOutcome, SchemaReport};
use crate::domain::{Item, ItemId};
use crate::ports::ItemRepository;
use async_trait::async_trait;
use shared::{Error, Result};

/// Stand-in store for environments that run without a backing store.
/// Every call reports the store as unavailable.
#[derive(Debug, Clone)]
pub struct DisabledItemStore {
    environment: String,
}

impl DisabledItemStore {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
        }
    }

    fn unavailable(&self) -> Error {
        Error::StoreUnavailable(format!(
            "backing store is disabled in the '{}' environment",
            self.environment
        ))
    }
}

#[async_trait]
impl ItemRepository for DisabledItemStore {
    async fn get(&self, _id: ItemId) -> Result<Option<Item>> {
        Err(self.unavailable())
    }

    async fn put(&self, _item: Item) -> Result<PutOutcome> {
        Err(self.unavailable())
    }

    async fn ensure_schema(&self) -> Result<SchemaReport> {
        Err(self.unavailable())
    }

    async fn ping(&self) -> Result<()> {
        Err(self.unavailable())
    }

    fn is_enabled(&self) -> bool {
        false
    }
}
