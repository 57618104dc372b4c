pub mod item_operations;
pub mod operation;

pub use item_operations::{ItemService, ServiceSettings};
pub use operation::ItemOperations;
