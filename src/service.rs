//! Cache-aside reads over a [`MovieCache`] and a [`MovieSource`].
//!
//! A read is served from the cache when it yields rows. Otherwise the source
//! is asked and, if it answers, the cache is populated on a best-effort basis.
//! Cache failures never fail a read; source failures on a miss always do.
//! Concurrent misses are not coalesced: each one fetches and populates on its
//! own.

use std::sync::Arc;

use crate::{
    cache::{CacheError, Collection, MovieCache},
    models::{Genre, MovieListItem},
    source::{MovieSource, SourceError},
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("movie service needs a {0}")]
    MissingCollaborator(&'static str),
    #[error(transparent)]
    Source(#[from] SourceError),
}

pub struct CachedMovieService {
    cache: Arc<dyn MovieCache>,
    source: Arc<dyn MovieSource>,
}

#[derive(Default)]
pub struct CachedMovieServiceBuilder {
    cache: Option<Arc<dyn MovieCache>>,
    source: Option<Arc<dyn MovieSource>>,
}

impl CachedMovieServiceBuilder {
    pub fn cache(mut self, cache: Arc<dyn MovieCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn source(mut self, source: Arc<dyn MovieSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn build(self) -> Result<CachedMovieService, ServiceError> {
        let cache = self.cache.ok_or(ServiceError::MissingCollaborator("cache"))?;
        let source = self.source.ok_or(ServiceError::MissingCollaborator("movie source"))?;
        Ok(CachedMovieService { cache, source })
    }
}

impl CachedMovieService {
    pub fn builder() -> CachedMovieServiceBuilder {
        CachedMovieServiceBuilder::default()
    }

    pub async fn get_genres(&self) -> Result<Vec<Genre>, ServiceError> {
        if let Some(genres) = usable(Collection::Genres, self.cache.get_genres().await) {
            return Ok(genres);
        }

        let genres = self.source.get_genres().await?;
        if let Err(err) = self.cache.set_genres(&genres).await {
            tracing::warn!(error = %err, count = genres.len(), "failed to populate genre cache");
        }
        Ok(genres)
    }

    /// Searches always go to the source and are never cached.
    pub async fn get_movies(&self, search: &str) -> Result<Vec<MovieListItem>, ServiceError> {
        if !search.is_empty() {
            tracing::debug!(search, "movie search bypasses cache");
            return Ok(self.source.get_movies(search).await?);
        }

        if let Some(movies) = usable(Collection::Movies, self.cache.get_movies().await) {
            return Ok(movies);
        }

        let movies = self.source.get_movies(search).await?;
        if let Err(err) = self.cache.set_movies(&movies).await {
            tracing::warn!(error = %err, count = movies.len(), "failed to populate movie cache");
        }
        Ok(movies)
    }
}

/// Turns a cache read into a hit, or `None` for a miss.
fn usable<T>(collection: Collection, read: Result<Vec<T>, CacheError>) -> Option<Vec<T>> {
    match read {
        Ok(rows) if !rows.is_empty() => {
            tracing::debug!(%collection, count = rows.len(), "cache hit");
            Some(rows)
        },
        Ok(_) | Err(CacheError::Empty(_)) => {
            tracing::debug!(%collection, "cache miss");
            None
        },
        Err(err) => {
            tracing::warn!(%collection, error = %err, "cache read failed, falling back to source");
            None
        },
    }
}
