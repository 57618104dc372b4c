use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Error, Result};

pub type ItemId = i64;

/// Rows inserted the first time the schema is created
pub const SEED_ITEMS: [(ItemId, &str); 3] = [(1, "alpha"), (2, "beta"), (3, "gamma")];

const CACHE_KEY_PREFIX: &str = "item:";

/// Cache key holding the value of item `id`
pub fn cache_key(id: ItemId) -> String {
    format!("{CACHE_KEY_PREFIX}{id}")
}

pub fn validate_id(id: ItemId) -> Result<()> {
    if id <= 0 {
        return Err(Error::Validation(format!(
            "id must be a positive integer, got {id}"
        )));
    }
    Ok(())
}

pub fn validate_value(value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation("value must not be empty".to_string()));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub value: String,
}

impl Item {
    /// Build a validated item
    pub fn new(id: ItemId, value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_id(id)?;
        validate_value(&value)?;
        Ok(Self { id, value })
    }

    pub fn cache_key(&self) -> String {
        cache_key(self.id)
    }
}

/// Persisted form of an item value
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemRecord {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

impl ItemRecord {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            updated_at: Utc::now(),
        }
    }
}

/// Where a returned value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Cache,
    Store,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteAction {
    Created,
    Updated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitState {
    NotStarted,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyStatus {
    Connected,
    Unavailable,
    Disabled,
}

pub mod response {
    use super::{DependencyStatus, Item, Source, WriteAction};

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct ReadResponse {
        pub item: Item,
        pub source: Source,
    }

    impl ReadResponse {
        pub fn new(item: Item, source: Source) -> Self {
            Self { item, source }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct WriteResponse {
        pub item: Item,
        pub source: Source,
        pub action: WriteAction,
    }

    /// Result of a backing store upsert
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct PutOutcome {
        pub item: Item,
        pub action: WriteAction,
    }

    impl PutOutcome {
        pub fn new(item: Item, action: WriteAction) -> Self {
            Self { item, action }
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SchemaReport {
        /// True only for the run that inserted the seed rows
        pub seeded: bool,
    }

    #[derive(Clone, Debug)]
    pub struct StatusReport {
        pub environment: String,
        pub store: DependencyStatus,
        pub cache: DependencyStatus,
        pub initialized: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_validation() {
        assert!(Item::new(1, "alpha").is_ok());
        assert!(matches!(Item::new(0, "alpha"), Err(Error::Validation(_))));
        assert!(matches!(Item::new(-4, "alpha"), Err(Error::Validation(_))));
        assert!(matches!(Item::new(7, ""), Err(Error::Validation(_))));
        assert!(matches!(Item::new(7, "   "), Err(Error::Validation(_))));
    }

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key(42), "item:42");
        assert_eq!(Item::new(3, "gamma").unwrap().cache_key(), "item:3");
    }

    #[test]
    fn test_provenance_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Cache).unwrap(), "\"cache\"");
        assert_eq!(
            serde_json::to_string(&WriteAction::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(
            serde_json::to_string(&DependencyStatus::Disabled).unwrap(),
            "\"disabled\""
        );
    }
}
