#![deny(clippy::all)]

pub mod domain;
pub mod persistence;
pub mod planes;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::{InitState, Item, ItemId, Source, WriteAction};
pub use planes::control::{Initializer, RetryPolicy};
pub use planes::data::{ItemOperations, ItemService};
pub use ports::{ItemCache, ItemRepository, StorageFactory};
