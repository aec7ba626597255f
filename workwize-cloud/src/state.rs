//! Application state for workwize-cloud

use std::sync::Arc;

use sqlx::PgPool;

use crate::assistant::llm::{AzureOpenAiClient, LlmClient};
use crate::config::Config;
use crate::db::PgStore;
use crate::error::BoxError;
use crate::middleware::rate_limit::RateLimiter;
use crate::sync::SyncOrchestrator;
use crate::workwize::{HttpWorkwizeClient, WorkwizeApi};

/// Shared application state, cloned per request
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Hosted chat model
    pub llm: Arc<dyn LlmClient>,
    pub sync: Arc<SyncOrchestrator>,
    /// Per-IP limits for `/api` routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect to Postgres, run migrations and build the outbound clients.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let api = HttpWorkwizeClient::new(
            config.workwize_base_url.clone(),
            config.workwize_key.clone(),
            config.upstream_timeout,
            config.max_pages,
        )?;
        let llm = AzureOpenAiClient::new(
            config.azure_openai_endpoint.clone(),
            config.azure_openai_api_key.clone(),
            config.azure_openai_deployment.clone(),
            config.azure_openai_api_version.clone(),
            config.upstream_timeout,
        )?;

        Ok(Self::from_parts(pool, config.clone(), Arc::new(api), Arc::new(llm)))
    }

    /// Assemble state around already-built clients.
    pub fn from_parts(
        pool: PgPool,
        config: Config,
        api: Arc<dyn WorkwizeApi>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        let store = Arc::new(PgStore::new(pool.clone()));
        let sync = SyncOrchestrator::new(api, store, config.address_fetch_delay);
        let rate_limiter = RateLimiter::new(config.rate_limit_max, config.rate_limit_window_secs);

        Self {
            pool,
            config: Arc::new(config),
            llm,
            sync: Arc::new(sync),
            rate_limiter,
        }
    }
}
