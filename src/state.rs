use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, ErrorLogService, SeaOrmAuthService, SeaOrmErrorLogService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub auth_service: Arc<dyn AuthService>,

    pub error_log_service: Arc<dyn ErrorLogService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.pepper.clone(),
        )) as Arc<dyn AuthService>;

        let error_log_service =
            Arc::new(SeaOrmErrorLogService::new(store)) as Arc<dyn ErrorLogService>;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            auth_service,
            error_log_service,
        })
    }
}
