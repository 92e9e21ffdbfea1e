use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};

use crate::entities::error_log;

pub struct ErrorLogRepository {
    conn: DatabaseConnection,
}

impl ErrorLogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn record(&self, filename: &str, line: i32, message: &str) -> Result<()> {
        let active = error_log::ActiveModel {
            filename: Set(filename.to_string()),
            line: Set(line),
            date: Set(chrono::Utc::now().to_rfc3339()),
            error: Set(message.to_string()),
            ..Default::default()
        };

        error_log::Entity::insert(active)
            .exec(&self.conn)
            .await
            .context("Failed to insert error log entry")?;

        Ok(())
    }

    /// Fetch one page of entries, newest first.
    pub async fn page(&self, start: u64, num_elements: u64) -> Result<Vec<error_log::Model>> {
        error_log::Entity::find()
            .order_by_desc(error_log::Column::Date)
            .offset(start)
            .limit(num_elements)
            .all(&self.conn)
            .await
            .context("Failed to fetch error log page")
    }

    pub async fn delete(&self, id: i64) -> Result<u64> {
        let result = error_log::Entity::delete_many()
            .filter(error_log::Column::Id.eq(id))
            .exec(&self.conn)
            .await
            .context("Failed to delete error log entry")?;

        Ok(result.rows_affected)
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let result = error_log::Entity::delete_many()
            .exec(&self.conn)
            .await
            .context("Failed to clear error log")?;

        Ok(result.rows_affected)
    }
}
