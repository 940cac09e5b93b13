mod cache;
mod config;
mod db;
mod entities;
mod error;
mod models;
mod routes;
mod service;
mod source;
mod templates;
mod tmdb;

use std::sync::Arc;

use crate::{
    cache::{SqliteCache, StoreOptions},
    config::Config,
    service::CachedMovieService,
    tmdb::TmdbClient,
};

pub struct AppState {
    pub movies: Arc<CachedMovieService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,reelcache=debug,migration=info,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    migration::up(&config.database_url, &config.migrations_dir).await?;

    let store = SqliteCache::connect(
        &config.database_url,
        StoreOptions { pool_size: config.cache_pool_size, timeout: config.cache_timeout },
    )
    .await?;

    let http = reqwest::Client::builder().user_agent("reelcache/0.1").build()?;
    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_rps,
        config.tmdb_timeout,
    );

    let movies = CachedMovieService::builder()
        .cache(Arc::new(store.clone()))
        .source(Arc::new(tmdb))
        .build()?;

    let app = routes::router(Arc::new(AppState { movies: Arc::new(movies) }));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    store.close().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
