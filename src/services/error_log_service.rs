//! Domain service for the server-side error log.

use serde::Serialize;
use thiserror::Error;

use crate::db::ErrorLogEntry;

#[derive(Debug, Error)]
pub enum ErrorLogError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Storage(String),
}

/// One page of log entries, newest first. `endOfData` is set when the page
/// came back short, so callers know to stop paging.
#[derive(Debug, Serialize)]
pub struct ErrorLogPage {
    pub entries: Vec<ErrorLogEntry>,
    #[serde(rename = "endOfData")]
    pub end_of_data: bool,
}

#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct Cleared {
    pub deleted: bool,
}

#[async_trait::async_trait]
pub trait ErrorLogService: Send + Sync {
    /// Record an entry; used by the storage diagnostic sink.
    async fn record(&self, filename: &str, line: i32, message: &str)
    -> Result<(), ErrorLogError>;

    async fn view(&self, start: u64, num_elements: u64) -> Result<ErrorLogPage, ErrorLogError>;

    async fn delete(&self, id: i64) -> Result<DeletedCount, ErrorLogError>;

    async fn delete_all(&self) -> Result<Cleared, ErrorLogError>;
}
