//! In-memory doubles for the store and cache ports.

use crate::domain::response::{PutOutcome, SchemaReport};
use crate::domain::{Item, ItemId, SEED_ITEMS, WriteAction};
use crate::ports::{ItemCache, ItemRepository};
use async_trait::async_trait;
use shared::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub(crate) struct MemoryStore {
    items: Mutex<HashMap<ItemId, String>>,
    down: AtomicBool,
    schema_delay: Duration,
    pub schema_runs: AtomicUsize,
    pub seed_inserts: AtomicUsize,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow schema creation widens the window for racing initializers
    pub fn with_schema_delay(delay: Duration) -> Self {
        Self {
            schema_delay: delay,
            ..Self::default()
        }
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn row_count(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn check(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn get(&self, id: ItemId) -> Result<Option<Item>> {
        self.check()?;
        self.gets.fetch_add(1, Ordering::SeqCst);
        let items = self.items.lock().unwrap();
        Ok(items.get(&id).map(|value| Item {
            id,
            value: value.clone(),
        }))
    }

    async fn put(&self, item: Item) -> Result<PutOutcome> {
        self.check()?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        let previous = self
            .items
            .lock()
            .unwrap()
            .insert(item.id, item.value.clone());
        let action = if previous.is_some() {
            WriteAction::Updated
        } else {
            WriteAction::Created
        };
        Ok(PutOutcome::new(item, action))
    }

    async fn ensure_schema(&self) -> Result<SchemaReport> {
        self.schema_runs.fetch_add(1, Ordering::SeqCst);
        if !self.schema_delay.is_zero() {
            tokio::time::sleep(self.schema_delay).await;
        }
        self.check()?;

        let mut items = self.items.lock().unwrap();
        if !items.is_empty() {
            return Ok(SchemaReport { seeded: false });
        }
        for (id, value) in SEED_ITEMS {
            items.insert(id, value.to_string());
        }
        self.seed_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(SchemaReport { seeded: true })
    }

    async fn ping(&self) -> Result<()> {
        self.check()
    }
}

/// Cache that remembers every entry and ignores TTLs
#[derive(Default)]
pub(crate) struct MemoryCache {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    pub sets: AtomicUsize,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, key: &str) -> Option<(String, Duration)> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), Duration::from_secs(60)));
    }
}

#[async_trait]
impl ItemCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entry(key).map(|(value, _)| value))
    }

    async fn set_with_ttl(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, ttl));
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Cache whose every call fails
#[derive(Default)]
pub(crate) struct BrokenCache {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ItemCache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::CacheUnavailable("connection refused".to_string()))
    }

    async fn set_with_ttl(&self, _key: &str, _value: String, _ttl: Duration) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::CacheUnavailable("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<()> {
        Err(Error::CacheUnavailable("connection refused".to_string()))
    }
}

/// Cache whose every call never completes
pub(crate) struct HangingCache;

#[async_trait]
impl ItemCache for HangingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        std::future::pending().await
    }

    async fn set_with_ttl(&self, _key: &str, _value: String, _ttl: Duration) -> Result<()> {
        std::future::pending().await
    }

    async fn ping(&self) -> Result<()> {
        std::future::pending().await
    }
}
