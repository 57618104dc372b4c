// shared/src/lib.rs

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("item not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("data error: {0}")]
    Data(String),
    #[error("internal: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

pub mod config;
