pub mod disabled;
pub mod sled_store;

pub use disabled::DisabledItemStore;
pub use sled_store::SledItemStore;
