mod config;
mod controllers;
mod error;
mod models;
mod routes;
mod services;

use std::sync::Arc;
use anyhow::Context;
use axum::Router;
use axum::routing::get;
use dotenv::dotenv;
use tracing_appender::non_blocking;
use tracing_subscriber::EnvFilter;
use crate::config::AppConfig;
use crate::routes::accounts_routes::accounts_routes;
use crate::routes::transaction_routes::transaction_routes;
use crate::services::db_operations::{DbOperations, LedgerStore};

pub struct AppState {
   pub database_connector: Box<dyn LedgerStore>
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (non_blocking, _guard) = non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(non_blocking).init();
    tracing::info!("Initialized tracing subscriber with async writer") ;
    dotenv().ok();
    tracing::info!("Loaded .env file") ;

    let config = AppConfig::from_env().context("invalid configuration")?;
    let database_connector = DbOperations::new(&config)
        .await
        .context("failed to connect to postgres")?;
    database_connector.init().await.context("failed to create ledger tables")?;
    tracing::info!("Database schema ready") ;

    let state = Arc::new(AppState { database_connector: Box::new(database_connector) }) ;

    tracing::info!("Starting server on port {}", config.port) ;
    let tcp_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!("Server started") ;
    axum::serve(tcp_listener, top_level_routes(state).await).await.context("server error")?;
    Ok(())
}


async fn top_level_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async {
            tracing::info!("Health check") ;
            "OK"
        }))
        .nest("/account/transactions", transaction_routes().await)
        .nest("/account", accounts_routes().await)
        .with_state(state)
}
