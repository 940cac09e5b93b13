//! Local copies of upstream genres and movies.
//!
//! A cache read either yields a non-empty collection or fails with
//! [`CacheError::Empty`], which callers treat as a miss.

pub mod genre_ids;
#[cfg(test)]
mod memory;
mod sqlite;

use std::fmt;

use async_trait::async_trait;

#[cfg(test)]
pub use memory::MemoryCache;
pub use sqlite::{SqliteCache, StoreOptions};

use crate::models::{Genre, MovieListItem};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Genres,
    Movies,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collection::Genres => "genres",
            Collection::Movies => "movies",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no {0} in cache")]
    Empty(Collection),
    #[error("cache operation on {0} timed out")]
    Timeout(Collection),
    #[error("insert into {0} returned a row")]
    UnexpectedRow(Collection),
    #[error("cache database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Read/write access to the cached collections.
///
/// `set_*` appends the whole batch or nothing; it never replaces rows that
/// are already present.
#[async_trait]
pub trait MovieCache: Send + Sync {
    async fn get_genres(&self) -> Result<Vec<Genre>, CacheError>;

    async fn set_genres(&self, genres: &[Genre]) -> Result<(), CacheError>;

    async fn get_movies(&self) -> Result<Vec<MovieListItem>, CacheError>;

    async fn set_movies(&self, movies: &[MovieListItem]) -> Result<(), CacheError>;
}
