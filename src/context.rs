/// Application context and dependency injection
use crate::{
    auth::AuthManager,
    config::AppConfig,
    db,
    error::ApiResult,
    users::UserManager,
};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: SqlitePool,
    pub users: Arc<UserManager>,
    pub auth: Arc<AuthManager>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: AppConfig) -> ApiResult<Self> {
        // Validate configuration
        config.validate()?;

        // Initialize account database
        let pool = db::create_pool(&config.storage.account_db, db::DatabaseOptions::default())
            .await?;

        // Run migrations
        db::run_migrations(&pool).await?;

        // Test connection
        db::test_connection(&pool).await?;

        Self::with_pool(config, pool)
    }

    /// Create a context over an existing pool (tests use an in-memory pool)
    pub fn with_pool(config: AppConfig, pool: SqlitePool) -> ApiResult<Self> {
        let users = Arc::new(UserManager::new(pool.clone()));
        let auth = Arc::new(AuthManager::new(pool.clone(), &config.auth)?);

        Ok(Self {
            config: Arc::new(config),
            db: pool,
            users,
            auth,
        })
    }
}
