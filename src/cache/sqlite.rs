use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sea_orm::{
    ConnAcquireErr, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult,
    Statement, TransactionTrait, Value,
};

use super::{CacheError, Collection, MovieCache};
use crate::{
    db,
    entities::{genres as genre_rows, movies as movie_rows},
    models::{Genre, MovieListItem},
};

#[derive(Clone, Copy, Debug)]
pub struct StoreOptions {
    /// Upper bound on pooled connections.
    pub pool_size: u32,
    /// Deadline for each cache operation, connection acquisition included.
    pub timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { pool_size: 200, timeout: Duration::from_secs(5) }
    }
}

/// SQLite-backed cache over a pooled [`DatabaseConnection`].
///
/// Every operation borrows a single pooled connection and gives it back when
/// it finishes, fails, times out or is dropped.
#[derive(Clone)]
pub struct SqliteCache {
    db: DatabaseConnection,
    timeout: Duration,
}

impl SqliteCache {
    pub async fn connect(database_url: &str, options: StoreOptions) -> Result<Self, CacheError> {
        let db = db::connect(database_url, options.pool_size, options.timeout).await?;
        Ok(Self::new(db, options.timeout))
    }

    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    #[cfg(test)]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Closes the pool. Any clone still in use fails afterwards, so call this
    /// only once the server has stopped.
    pub async fn close(self) -> Result<(), CacheError> {
        self.db.close().await?;
        tracing::info!("cache pool closed");
        Ok(())
    }

    /// Runs `op` under the store deadline. A deadline hit and a pool acquire
    /// timeout both surface as [`CacheError::Timeout`].
    async fn bounded<T, F>(&self, collection: Collection, op: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(Err(CacheError::Database(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout))))
            | Err(_) => Err(CacheError::Timeout(collection)),
            Ok(result) => result,
        }
    }

    async fn select_all<M>(
        &self,
        collection: Collection,
        sql: &'static str,
    ) -> Result<Vec<M>, CacheError>
    where
        M: FromQueryResult + Send,
    {
        let rows = self
            .bounded(collection, async {
                let stmt = Statement::from_string(DbBackend::Sqlite, sql);
                Ok::<_, CacheError>(M::find_by_statement(stmt).all(&self.db).await?)
            })
            .await?;

        if rows.is_empty() {
            return Err(CacheError::Empty(collection));
        }
        Ok(rows)
    }

    /// Inserts all rows in one transaction; the first failing row rolls the
    /// whole batch back.
    async fn insert_batch(
        &self,
        collection: Collection,
        sql: &'static str,
        rows: Vec<Vec<Value>>,
    ) -> Result<(), CacheError> {
        self.bounded(collection, async {
            let txn = self.db.begin().await?;
            for values in rows {
                let stmt = Statement::from_sql_and_values(DbBackend::Sqlite, sql, values);
                if txn.query_one(stmt).await?.is_some() {
                    return Err(CacheError::UnexpectedRow(collection));
                }
            }
            txn.commit().await?;
            Ok::<_, CacheError>(())
        })
        .await
    }
}

#[async_trait]
impl MovieCache for SqliteCache {
    async fn get_genres(&self) -> Result<Vec<Genre>, CacheError> {
        let rows: Vec<genre_rows::Model> =
            self.select_all(Collection::Genres, genre_rows::SELECT_ALL).await?;
        Ok(rows.into_iter().map(Genre::from).collect())
    }

    async fn set_genres(&self, genres: &[Genre]) -> Result<(), CacheError> {
        let rows = genres.iter().map(genre_rows::insert_values).collect();
        self.insert_batch(Collection::Genres, genre_rows::INSERT, rows).await
    }

    async fn get_movies(&self) -> Result<Vec<MovieListItem>, CacheError> {
        let rows: Vec<movie_rows::Model> =
            self.select_all(Collection::Movies, movie_rows::SELECT_ALL).await?;
        Ok(rows.into_iter().map(MovieListItem::from).collect())
    }

    async fn set_movies(&self, movies: &[MovieListItem]) -> Result<(), CacheError> {
        let rows = movies.iter().map(movie_rows::insert_values).collect();
        self.insert_batch(Collection::Movies, movie_rows::INSERT, rows).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;

    const MIGRATIONS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

    async fn open(options: StoreOptions) -> (TempDir, SqliteCache) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("cache.db").display());
        let cache = SqliteCache::connect(&url, options).await.unwrap();
        migration::run(cache.db(), Path::new(MIGRATIONS)).await.unwrap();
        (dir, cache)
    }

    fn options() -> StoreOptions {
        StoreOptions { pool_size: 4, timeout: Duration::from_secs(2) }
    }

    fn genre(id: i32, name: &str) -> Genre {
        Genre { id, name: name.to_string() }
    }

    fn arrival() -> MovieListItem {
        MovieListItem {
            title_en: "Arrival".to_string(),
            overview: "A linguist works with the military to communicate with alien lifeforms."
                .to_string(),
            vote_average: 7.9,
            genre_ids: vec![18, 878],
            poster_src: "/x2FJsf1ElAgr63Y3PNPtJrcmpoe.jpg".to_string(),
            release_year: 2016,
        }
    }

    #[tokio::test]
    async fn empty_tables_are_misses() {
        let (_dir, cache) = open(options()).await;

        assert!(matches!(cache.get_genres().await, Err(CacheError::Empty(Collection::Genres))));
        assert!(matches!(cache.get_movies().await, Err(CacheError::Empty(Collection::Movies))));
    }

    #[tokio::test]
    async fn genres_read_back_in_insert_order() {
        let (_dir, cache) = open(options()).await;
        let genres = vec![genre(878, "Science Fiction"), genre(18, "Drama"), genre(28, "Action")];

        cache.set_genres(&genres).await.unwrap();

        assert_eq!(cache.get_genres().await.unwrap(), genres);
    }

    #[tokio::test]
    async fn movies_keep_genre_ids_and_vote() {
        let (_dir, cache) = open(options()).await;
        let untagged = MovieListItem {
            title_en: "Untitled".to_string(),
            genre_ids: vec![],
            vote_average: 6.25,
            ..arrival()
        };

        cache.set_movies(&[arrival(), untagged.clone()]).await.unwrap();

        let movies = cache.get_movies().await.unwrap();
        assert_eq!(movies, vec![arrival(), untagged]);
        assert_eq!(movies[0].genre_ids, vec![18, 878]);
    }

    #[tokio::test]
    async fn repeated_sets_append() {
        let (_dir, cache) = open(options()).await;
        let genres = vec![genre(18, "Drama")];

        cache.set_genres(&genres).await.unwrap();
        cache.set_genres(&genres).await.unwrap();

        assert_eq!(cache.get_genres().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failed_row_rolls_back_batch() {
        let (_dir, cache) = open(options()).await;
        cache
            .db()
            .execute_unprepared(
                "CREATE TRIGGER reject_bad_genre BEFORE INSERT ON genres
                 WHEN NEW.name = 'bad'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END",
            )
            .await
            .unwrap();

        let err = cache
            .set_genres(&[genre(18, "Drama"), genre(99, "bad"), genre(28, "Action")])
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::Database(_)), "{err}");
        assert!(matches!(cache.get_genres().await, Err(CacheError::Empty(_))));
    }

    #[tokio::test]
    async fn exhausted_pool_times_out() {
        let (_dir, cache) =
            open(StoreOptions { pool_size: 1, timeout: Duration::from_millis(200) }).await;

        let held = cache.db().begin().await.unwrap();
        let err = cache.get_genres().await.unwrap_err();
        assert!(matches!(err, CacheError::Timeout(Collection::Genres)), "{err}");

        drop(held);
        cache.set_genres(&[genre(18, "Drama")]).await.unwrap();
        assert_eq!(cache.get_genres().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn returned_row_is_rejected_and_rolled_back() {
        let (_dir, cache) = open(options()).await;
        let rows = vec![
            genre_rows::insert_values(&genre(18, "Drama")),
            genre_rows::insert_values(&genre(878, "Science Fiction")),
        ];

        let err = cache
            .insert_batch(
                Collection::Genres,
                "INSERT INTO genres (id, name) VALUES (?, ?) RETURNING id",
                rows,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::UnexpectedRow(Collection::Genres)), "{err}");
        assert!(matches!(cache.get_genres().await, Err(CacheError::Empty(Collection::Genres))));
    }

    #[tokio::test]
    async fn cancelled_batch_rolls_back_and_frees_connection() {
        let (_dir, cache) =
            open(StoreOptions { pool_size: 1, timeout: Duration::from_secs(2) }).await;
        let many: Vec<Genre> = (0..20_000).map(|id| genre(id, "Filler")).collect();

        let cancelled =
            tokio::time::timeout(Duration::from_millis(5), cache.set_genres(&many)).await.is_err();
        assert!(cancelled);

        let after = cache.get_genres().await;
        assert!(matches!(after, Err(CacheError::Empty(Collection::Genres))), "{after:?}");
    }

    #[tokio::test]
    async fn close_drains_pool() {
        let (_dir, cache) = open(options()).await;
        cache.set_genres(&[genre(18, "Drama")]).await.unwrap();

        cache.close().await.unwrap();
    }
}
