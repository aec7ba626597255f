//! workwize-cloud: PII-safe cache of Workwize HR and IT asset data
//!
//! Long-running service that:
//! - Pulls employees, assets, orders and related records from the Workwize API
//! - Scrubs personal data before anything is written to PostgreSQL
//! - Serves the cached tables over a REST API
//! - Answers asset questions through a hosted chat model

mod api;
mod assistant;
mod config;
mod db;
mod error;
mod middleware;
mod pii;
mod state;
mod sync;
mod workwize;

use std::net::SocketAddr;

use config::{Config, LogFormat};
use error::BoxError;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "workwize_cloud=info,tower_http=info".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    shared::error::mask_system_errors(config.is_production());

    tracing::info!("Starting workwize-cloud (env: {})", config.environment);

    // Initialize application state
    let state = AppState::new(&config).await?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("workwize-cloud HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
