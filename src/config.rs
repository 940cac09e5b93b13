use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub migrations_dir: PathBuf,
    pub tmdb_access_token: String,
    pub tmdb_base_url: String,
    pub tmdb_rps: u32,
    pub tmdb_timeout: Duration,
    pub cache_pool_size: u32,
    pub cache_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "1337".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://reelcache.db?mode=rwc".to_string());
        let migrations_dir =
            std::env::var("MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string()).into();

        let tmdb_access_token = std::env::var("TMDB_ACCESS_TOKEN").unwrap_or_default();
        if tmdb_access_token.trim().is_empty() {
            anyhow::bail!("TMDB_ACCESS_TOKEN must be set");
        }
        let tmdb_base_url = std::env::var("TMDB_BASE_URL")
            .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            migrations_dir,
            tmdb_access_token,
            tmdb_base_url,
            tmdb_rps: env_or("TMDB_RPS", 4)?,
            tmdb_timeout: Duration::from_secs(env_or("TMDB_TIMEOUT_SECS", 5)?),
            cache_pool_size: env_or("CACHE_POOL_SIZE", 200)?,
            cache_timeout: Duration::from_millis(env_or("CACHE_TIMEOUT_MS", 5_000)?),
        })
    }
}

fn env_or<T>(key: &'static str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().context(key),
        Err(_) => Ok(default),
    }
}
