use async_trait::async_trait;

use crate::models::{Genre, MovieListItem};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream {endpoint} responded with status {status}")]
    Status { endpoint: &'static str, status: u16 },
}

/// Authoritative origin of the catalog.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn get_genres(&self) -> Result<Vec<Genre>, SourceError>;

    /// Top-rated movies when `search` is empty, otherwise matches for it.
    async fn get_movies(&self, search: &str) -> Result<Vec<MovieListItem>, SourceError>;
}
