use crate::domain::response::{PutOutcome, SchemaReport};
use crate::domain::{Item, ItemId, ItemRecord, SEED_ITEMS, WriteAction};
use crate::ports::ItemRepository;
use async_trait::async_trait;
use chrono::Utc;
use shared::config::StoreConfig;
use shared::{Error, Result};
use sled::transaction::{TransactionError, TransactionResult};
use sled::{Db, Transactional, Tree};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

const ITEMS_TREE: &str = "items";
const META_TREE: &str = "meta";
const SEEDED_KEY: &[u8] = b"seeded";

/// Sled-backed item store.
///
/// The database is opened lazily on first use and the handle is shared by all
/// calls afterwards; each call clones the handle for the duration of one
/// blocking unit of work. A failed open is not remembered, so a store that
/// was not ready at startup is picked up by a later call.
pub struct SledItemStore {
    path: PathBuf,
    timeout: Duration,
    db: OnceCell<Db>,
}

impl SledItemStore {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
            db: OnceCell::new(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.path(), config.timeout)
    }

    async fn connection(&self) -> Result<Db> {
        let db = self
            .db
            .get_or_try_init(|| {
                let path = self.path.clone();
                self.run_blocking(move || open_db(&path))
            })
            .await?;
        Ok(db.clone())
    }

    /// Run a blocking sled operation on the blocking pool, bounded by the store timeout
    async fn run_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(op)).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(Error::Internal(format!("store task failed: {}", e))),
            Err(_) => Err(Error::StoreUnavailable(format!(
                "store call timed out after {:?}",
                self.timeout
            ))),
        }
    }

    /// Run a blocking write. A write is never abandoned at the deadline: the
    /// caller waits for its real outcome, so an error never hides a commit.
    async fn finish_blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let mut task = tokio::task::spawn_blocking(op);
        let joined = match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(timeout = ?self.timeout, "store write outlasted its timeout, waiting for it");
                task.await
            }
        };
        joined.map_err(|e| Error::Internal(format!("store task failed: {}", e)))?
    }

    async fn with_connection<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Db) -> Result<T> + Send + 'static,
    {
        let db = self.connection().await?;
        self.run_blocking(move || op(db)).await
    }
}

#[async_trait]
impl ItemRepository for SledItemStore {
    async fn get(&self, id: ItemId) -> Result<Option<Item>> {
        self.with_connection(move |db| {
            let items = items_tree(&db)?;
            match items.get(item_key(id)).map_err(store_error)? {
                Some(bytes) => {
                    let record = decode_record(&bytes)?;
                    Ok(Some(Item {
                        id,
                        value: record.value,
                    }))
                }
                None => Ok(None),
            }
        })
        .await
    }

    async fn put(&self, item: Item) -> Result<PutOutcome> {
        let bytes = encode_record(&ItemRecord::new(item.value.clone()))?;
        let db = self.connection().await?;

        self.finish_blocking(move || {
            let items = items_tree(&db)?;
            let previous = items
                .insert(item_key(item.id), bytes)
                .map_err(store_error)?;
            items.flush().map_err(store_error)?;

            let action = if previous.is_some() {
                WriteAction::Updated
            } else {
                WriteAction::Created
            };
            debug!(id = item.id, ?action, "item persisted");

            Ok(PutOutcome::new(item, action))
        })
        .await
    }

    async fn ensure_schema(&self) -> Result<SchemaReport> {
        let mut seed_rows = Vec::with_capacity(SEED_ITEMS.len());
        for (id, value) in SEED_ITEMS {
            seed_rows.push((item_key(id).to_vec(), encode_record(&ItemRecord::new(value))?));
        }
        let seeded_at = Utc::now().to_rfc3339().into_bytes();

        self.with_connection(move |db| {
            let items = items_tree(&db)?;
            let meta = db.open_tree(META_TREE).map_err(store_error)?;

            // The marker and the rows commit together, so seeding happens once
            // and never overwrites an id that was written before it.
            let result: TransactionResult<bool, ()> =
                (&items, &meta).transaction(|(items, meta)| {
                    if meta.get(SEEDED_KEY)?.is_some() {
                        return Ok(false);
                    }
                    for (key, record) in &seed_rows {
                        if items.get(key)?.is_none() {
                            items.insert(key.clone(), record.clone())?;
                        }
                    }
                    meta.insert(SEEDED_KEY, seeded_at.clone())?;
                    Ok(true)
                });

            match result {
                Ok(seeded) => {
                    db.flush().map_err(store_error)?;
                    if seeded {
                        info!(rows = seed_rows.len(), "seeded backing store");
                    }
                    Ok(SchemaReport { seeded })
                }
                Err(TransactionError::Storage(e)) => Err(store_error(e)),
                Err(TransactionError::Abort(())) => {
                    Err(Error::Internal("schema transaction aborted".to_string()))
                }
            }
        })
        .await
    }

    async fn ping(&self) -> Result<()> {
        self.with_connection(|db| db.size_on_disk().map(|_| ()).map_err(store_error))
            .await
    }
}

impl std::fmt::Debug for SledItemStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledItemStore")
            .field("path", &self.path)
            .field("timeout", &self.timeout)
            .field("open", &self.db.initialized())
            .finish()
    }
}

fn open_db(path: &Path) -> Result<Db> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::StoreUnavailable(format!("failed to create store directory: {}", e))
        })?;
    }

    let db = sled::open(path).map_err(|e| {
        Error::StoreUnavailable(format!(
            "failed to open store at {}: {}",
            path.display(),
            e
        ))
    })?;
    info!(path = %path.display(), "opened backing store");

    Ok(db)
}

fn items_tree(db: &Db) -> Result<Tree> {
    db.open_tree(ITEMS_TREE).map_err(store_error)
}

fn item_key(id: ItemId) -> [u8; 8] {
    id.to_be_bytes()
}

fn store_error(err: sled::Error) -> Error {
    match &err {
        sled::Error::Corruption { .. } => Error::Data(format!("store corruption: {}", err)),
        _ => Error::StoreUnavailable(err.to_string()),
    }
}

fn encode_record(record: &ItemRecord) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| Error::Data(format!("failed to serialize item: {}", e)))
}

fn decode_record(bytes: &[u8]) -> Result<ItemRecord> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Data(format!("failed to deserialize item: {}", e)))
}
