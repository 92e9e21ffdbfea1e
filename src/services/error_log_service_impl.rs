//! `SeaORM` implementation of the `ErrorLogService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::services::error_log_service::{
    Cleared, DeletedCount, ErrorLogError, ErrorLogPage, ErrorLogService,
};

pub struct SeaOrmErrorLogService {
    store: Store,
}

impl SeaOrmErrorLogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ErrorLogService for SeaOrmErrorLogService {
    async fn record(
        &self,
        filename: &str,
        line: i32,
        message: &str,
    ) -> Result<(), ErrorLogError> {
        self.store
            .record_error(filename, line, message)
            .await
            .map_err(|e| ErrorLogError::Storage(e.to_string()))
    }

    async fn view(&self, start: u64, num_elements: u64) -> Result<ErrorLogPage, ErrorLogError> {
        let entries = self
            .store
            .error_log_page(start, num_elements)
            .await
            .map_err(|e| ErrorLogError::Storage(e.to_string()))?;

        let end_of_data = (entries.len() as u64) < num_elements;

        Ok(ErrorLogPage {
            entries,
            end_of_data,
        })
    }

    async fn delete(&self, id: i64) -> Result<DeletedCount, ErrorLogError> {
        let deleted = self
            .store
            .delete_error(id)
            .await
            .map_err(|e| ErrorLogError::Storage(e.to_string()))?;

        Ok(DeletedCount { deleted })
    }

    async fn delete_all(&self) -> Result<Cleared, ErrorLogError> {
        self.store
            .clear_error_log()
            .await
            .map_err(|e| ErrorLogError::Storage(e.to_string()))?;

        Ok(Cleared { deleted: true })
    }
}
