use crate::domain::ItemId;
use crate::domain::response::{ReadResponse, StatusReport, WriteResponse};
use async_trait::async_trait;
use shared::Result;

/// Application-level item operations
/// This is what the HTTP layer calls into
#[async_trait]
pub trait ItemOperations: Send + Sync + 'static {
    /// `Ok(None)` means the item does not exist
    async fn read(&self, id: ItemId) -> Result<Option<ReadResponse>>;

    async fn write(&self, id: ItemId, value: String) -> Result<WriteResponse>;

    /// Connectivity of both dependencies; never mutates state
    async fn status(&self) -> StatusReport;
}
