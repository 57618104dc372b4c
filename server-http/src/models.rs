use itemstore::domain::response::{ReadResponse, StatusReport, WriteResponse};
use itemstore::domain::DependencyStatus;
use itemstore::{ItemId, Source, WriteAction};
use serde::{Deserialize, Serialize};

// === Item Models ===

#[derive(Debug, Deserialize)]
pub struct WriteItemRequest {
    pub id: ItemId,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub value: String,
    pub source: Source,
}

impl From<ReadResponse> for ItemResponse {
    fn from(read: ReadResponse) -> Self {
        Self {
            id: read.item.id,
            value: read.item.value,
            source: read.source,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WriteItemResponse {
    pub id: ItemId,
    pub value: String,
    pub source: Source,
    pub action: WriteAction,
}

impl From<WriteResponse> for WriteItemResponse {
    fn from(written: WriteResponse) -> Self {
        Self {
            id: written.item.id,
            value: written.item.value,
            source: written.source,
            action: written.action,
        }
    }
}

// === Service Models ===

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub environment: String,
    pub store: DependencyStatus,
    pub cache: DependencyStatus,
    pub initialized: bool,
}

impl From<StatusReport> for StatusResponse {
    fn from(report: StatusReport) -> Self {
        Self {
            environment: report.environment,
            store: report.store,
            cache: report.cache,
            initialized: report.initialized,
        }
    }
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
