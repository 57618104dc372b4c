use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Environment tag that runs the service without a backing store
pub const LOCAL_ENV: &str = "local";

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub data_dir: String,
    pub name: String,
    pub timeout: Duration,
}

impl StoreConfig {
    /// Location of the sled database: `<data_dir>/<name>.sled`
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(format!("{}.sled", self.name))
    }
}

#[derive(Clone, Debug)]
pub struct CacheSettings {
    pub enabled: bool,
    pub max_entries: u64,
    pub ttl: Duration,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct InitSettings {
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
    pub attempt_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub store: StoreConfig,
    pub cache: CacheSettings,
    pub init: InitSettings,
}

impl Config {
    const DEFAULT_ENV: &str = LOCAL_ENV;
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8000;
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_STORE_NAME: &str = "appdb";
    const DEFAULT_STORE_TIMEOUT_MS: u64 = 2_000;
    const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;
    const DEFAULT_CACHE_TTL_SECS: u64 = 60;
    const DEFAULT_CACHE_TIMEOUT_MS: u64 = 250;
    const DEFAULT_INIT_RETRY_ATTEMPTS: u32 = 5;
    const DEFAULT_INIT_RETRY_BACKOFF_MS: u64 = 2_000;
    const DEFAULT_INIT_TIMEOUT_MS: u64 = 5_000;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            environment: string("APP_ENV", Self::DEFAULT_ENV),
            host: string("APP_HOST", Self::DEFAULT_HOST),
            port: parse_or(&lookup, "APP_PORT", Self::DEFAULT_PORT),
            store: StoreConfig {
                data_dir: string("STORE_DATA_DIR", Self::DEFAULT_DATA_DIR),
                name: string("STORE_NAME", Self::DEFAULT_STORE_NAME),
                timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "STORE_TIMEOUT_MS",
                    Self::DEFAULT_STORE_TIMEOUT_MS,
                )),
            },
            cache: CacheSettings {
                enabled: parse_or(&lookup, "CACHE_ENABLED", true),
                max_entries: parse_or(
                    &lookup,
                    "CACHE_MAX_ENTRIES",
                    Self::DEFAULT_CACHE_MAX_ENTRIES,
                ),
                ttl: Duration::from_secs(parse_or(
                    &lookup,
                    "CACHE_TTL_SECS",
                    Self::DEFAULT_CACHE_TTL_SECS,
                )),
                timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "CACHE_TIMEOUT_MS",
                    Self::DEFAULT_CACHE_TIMEOUT_MS,
                )),
            },
            init: InitSettings {
                retry_attempts: parse_or(
                    &lookup,
                    "INIT_RETRY_ATTEMPTS",
                    Self::DEFAULT_INIT_RETRY_ATTEMPTS,
                ),
                retry_backoff: Duration::from_millis(parse_or(
                    &lookup,
                    "INIT_RETRY_BACKOFF_MS",
                    Self::DEFAULT_INIT_RETRY_BACKOFF_MS,
                )),
                attempt_timeout: Duration::from_millis(parse_or(
                    &lookup,
                    "INIT_TIMEOUT_MS",
                    Self::DEFAULT_INIT_TIMEOUT_MS,
                )),
            },
        }
    }

    /// The `local` environment runs without the backing store
    pub fn store_enabled(&self) -> bool {
        self.environment != LOCAL_ENV
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.environment, "local");
        assert!(!config.store_enabled());
        assert_eq!(config.port, 8000);
        assert_eq!(config.cache.ttl, Duration::from_secs(60));
        assert!(config.cache.enabled);
        assert!(config.cache.timeout < Duration::from_secs(1));
        assert_eq!(config.init.retry_attempts, 5);
        assert_eq!(config.store.path(), PathBuf::from("./data/appdb.sled"));
    }

    #[test]
    fn test_overrides() {
        let config = config_with(&[
            ("APP_ENV", "production"),
            ("APP_PORT", "9090"),
            ("STORE_NAME", "items"),
            ("CACHE_ENABLED", "false"),
            ("CACHE_TTL_SECS", "5"),
        ]);

        assert!(config.store_enabled());
        assert_eq!(config.bind_address(), "0.0.0.0:9090");
        assert_eq!(config.store.name, "items");
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_with(&[("APP_PORT", "not-a-port"), ("CACHE_ENABLED", "maybe")]);

        assert_eq!(config.port, 8000);
        assert!(config.cache.enabled);
    }
}
