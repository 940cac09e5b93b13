use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheError, Collection, MovieCache};
use crate::models::{Genre, MovieListItem};

/// In-process cache with the same miss and append semantics as the SQLite
/// store.
#[derive(Debug, Default)]
pub struct MemoryCache {
    genres: RwLock<Vec<Genre>>,
    movies: RwLock<Vec<MovieListItem>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genres(genres: Vec<Genre>) -> Self {
        Self { genres: RwLock::new(genres), ..Self::default() }
    }

    pub fn with_movies(movies: Vec<MovieListItem>) -> Self {
        Self { movies: RwLock::new(movies), ..Self::default() }
    }
}

#[async_trait]
impl MovieCache for MemoryCache {
    async fn get_genres(&self) -> Result<Vec<Genre>, CacheError> {
        let genres = self.genres.read().await;
        if genres.is_empty() {
            return Err(CacheError::Empty(Collection::Genres));
        }
        Ok(genres.clone())
    }

    async fn set_genres(&self, genres: &[Genre]) -> Result<(), CacheError> {
        self.genres.write().await.extend_from_slice(genres);
        Ok(())
    }

    async fn get_movies(&self) -> Result<Vec<MovieListItem>, CacheError> {
        let movies = self.movies.read().await;
        if movies.is_empty() {
            return Err(CacheError::Empty(Collection::Movies));
        }
        Ok(movies.clone())
    }

    async fn set_movies(&self, movies: &[MovieListItem]) -> Result<(), CacheError> {
        self.movies.write().await.extend_from_slice(movies);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_until_set() {
        let cache = MemoryCache::new();
        assert!(matches!(cache.get_genres().await, Err(CacheError::Empty(Collection::Genres))));

        let drama = Genre { id: 18, name: "Drama".to_string() };
        cache.set_genres(std::slice::from_ref(&drama)).await.unwrap();
        cache.set_genres(std::slice::from_ref(&drama)).await.unwrap();

        assert_eq!(cache.get_genres().await.unwrap(), vec![drama.clone(), drama]);
        assert!(matches!(cache.get_movies().await, Err(CacheError::Empty(Collection::Movies))));
    }
}
