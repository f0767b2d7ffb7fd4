mod auth;
mod config;
mod db;
mod errors;
mod github;
mod models;
mod profile;
mod routes;
mod state;
mod store;
mod users;
mod validation;

#[cfg(test)]
mod tests;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::password::ArgonHasher;
use crate::auth::token::TokenKeys;
use crate::config::Config;
use crate::db::create_pool;
use crate::github::GithubClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; missing required env vars abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DevHub API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    let github = GithubClient::new(config.github_client_id.clone(), config.github_secret.clone())?;
    info!("GitHub client initialized");

    let state = AppState {
        store: Arc::new(PgStore::new(db)),
        hasher: Arc::new(ArgonHasher::default()),
        tokens: TokenKeys::new(&config.jwt_secret, config.token_ttl_secs),
        github,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
