pub mod health;
pub mod items;

pub use health::{health_check, status};
pub use items::{get_item, write_item};
