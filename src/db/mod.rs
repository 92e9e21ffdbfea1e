use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub mod migrator;
pub mod repositories;

pub use crate::entities::error_log::Model as ErrorLogEntry;
pub use crate::entities::users::Model as UserRow;
pub use repositories::user::ProfileChanges;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to an in-memory SQLite database sees its
        // own empty database, so those get a single connection.
        let max_connections = if db_url.contains(":memory:") {
            1
        } else {
            max_connections
        };

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections.min(max_connections))
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn error_log_repo(&self) -> repositories::error_log::ErrorLogRepository {
        repositories::error_log::ErrorLogRepository::new(self.conn.clone())
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.user_repo().find_by_username(username).await
    }

    pub async fn insert_user(
        &self,
        username: &str,
        hash: &str,
        name: &str,
        email: &str,
        modification: &str,
    ) -> Result<i32> {
        self.user_repo()
            .insert(username, hash, name, email, modification)
            .await
    }

    pub async fn rotate_user_credentials(
        &self,
        id: i32,
        previous_epoch: &str,
        epoch: &str,
        hash: &str,
    ) -> Result<u64> {
        self.user_repo()
            .rotate_credentials(id, previous_epoch, epoch, hash)
            .await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        previous_epoch: &str,
        changes: &ProfileChanges<'_>,
    ) -> Result<u64> {
        self.user_repo()
            .update_profile(id, previous_epoch, changes)
            .await
    }

    pub async fn record_error(&self, filename: &str, line: i32, message: &str) -> Result<()> {
        self.error_log_repo().record(filename, line, message).await
    }

    pub async fn error_log_page(
        &self,
        start: u64,
        num_elements: u64,
    ) -> Result<Vec<ErrorLogEntry>> {
        self.error_log_repo().page(start, num_elements).await
    }

    pub async fn delete_error(&self, id: i64) -> Result<u64> {
        self.error_log_repo().delete(id).await
    }

    pub async fn clear_error_log(&self) -> Result<u64> {
        self.error_log_repo().delete_all().await
    }

    /// Diagnostic sink for storage-layer failures: best effort, never fails
    /// the primary operation.
    pub async fn report_storage_failure(&self, location: &str, line: u32, context: &str) {
        if let Err(e) = self
            .record_error(location, i32::try_from(line).unwrap_or(0), context)
            .await
        {
            warn!("Error log sink unavailable: {e}");
        }
    }
}
