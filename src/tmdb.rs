use std::{num::NonZeroU32, sync::Arc, time::Duration};

use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use jiff::civil::Date;
use reqwest::header::ACCEPT;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    models::{Genre, MovieListItem},
    source::{MovieSource, SourceError},
};

const GENRES_PATH: &str = "genre/movie/list";
const DISCOVER_PATH: &str = "discover/movie";
const SEARCH_PATH: &str = "search/movie";
const MIN_VOTE_COUNT: &str = "1000";

pub struct TmdbClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    timeout: Duration,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl TmdbClient {
    pub fn new(
        client: reqwest::Client,
        access_token: String,
        base_url: String,
        rps: u32,
        timeout: Duration,
    ) -> Self {
        let rps = NonZeroU32::new(rps).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(rps)));
        Self { client, access_token, base_url, timeout, limiter }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        self.limiter.until_ready().await;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .query(query)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status { endpoint: path, status: status.as_u16() });
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    async fn get_genres(&self) -> Result<Vec<Genre>, SourceError> {
        let resp: GenreListResponse = self.get_json(GENRES_PATH, &[("language", "en")]).await?;
        Ok(resp.genres.into_iter().map(|g| Genre { id: g.id, name: g.name }).collect())
    }

    async fn get_movies(&self, search: &str) -> Result<Vec<MovieListItem>, SourceError> {
        let mut query = vec![
            ("page", "1"),
            ("include_adult", "false"),
            ("sort_by", "vote_average.desc"),
            ("vote_count.gte", MIN_VOTE_COUNT),
        ];
        let path = if search.is_empty() {
            DISCOVER_PATH
        } else {
            query.push(("query", search));
            SEARCH_PATH
        };

        let resp: MovieListResponse = self.get_json(path, &query).await?;
        tracing::debug!(path, results = resp.results.len(), "fetched movies");
        Ok(list_items(resp.results))
    }
}

/// Maps upstream results, dropping those without a usable release date.
fn list_items(results: Vec<MovieEntry>) -> Vec<MovieListItem> {
    results
        .into_iter()
        .filter_map(|m| {
            let release_date = m.release_date.as_deref().unwrap_or_default();
            let Ok(date) = release_date.parse::<Date>() else {
                tracing::warn!(
                    movie_id = m.id,
                    release_date,
                    "skipping movie without release date"
                );
                return None;
            };

            Some(MovieListItem {
                title_en: m.title,
                overview: m.overview,
                vote_average: m.vote_average,
                genre_ids: m.genre_ids,
                poster_src: m.poster_path.unwrap_or_default(),
                release_year: i32::from(date.year()),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<GenreEntry>,
}

#[derive(Debug, Deserialize)]
struct GenreEntry {
    id: i32,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MovieListResponse {
    results: Vec<MovieEntry>,
}

#[derive(Debug, Deserialize)]
struct MovieEntry {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    vote_average: f32,
    #[serde(default)]
    genre_ids: Vec<i32>,
    poster_path: Option<String>,
    release_date: Option<String>,
}
