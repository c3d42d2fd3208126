mod auth;
mod config;
mod db;
mod dispatch;
mod errors;
mod models;
mod mutation;
mod queue;
mod resolution;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::mongo::MongoStore;
use crate::dispatch::protocol::Dispatcher;
use crate::queue::redis::RedisQueue;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cover Letter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize MongoDB
    let store = MongoStore::connect(&config.mongo_uri, &config.db_name).await?;

    // Initialize Redis
    let queue = RedisQueue::connect(&config.redis_url).await?;
    info!(
        "Queues: generation='{}', delivery='{}'",
        config.generation_queue, config.delivery_queue
    );

    if config.admin_password.is_none() {
        info!("ADMIN_PASSWORD not set; login is disabled");
    }

    // Build app state
    let state = AppState {
        store: Arc::new(store),
        dispatcher: Dispatcher::new(
            Arc::new(queue),
            config.generation_queue.clone(),
            config.delivery_queue.clone(),
        ),
        tokens: TokenIssuer::new(&config.jwt_secret),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
