use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::HeaderValue,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    error::AppResult,
    models::MovieCard,
    templates,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(movies))
        .route("/movies", get(movies))
        .route("/movie-list", get(movie_list))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    search: String,
}

pub async fn movies(Query(q): Query<SearchQuery>) -> Html<String> {
    Html(templates::movies_page(q.search.trim()))
}

pub async fn movie_list(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SearchQuery>,
) -> Response {
    let mut resp = render_movie_list(&state, q.search.trim()).await.into_response();
    resp.headers_mut()
        .insert("datastar-selector", HeaderValue::from_static("#content"));
    resp.headers_mut()
        .insert("datastar-mode", HeaderValue::from_static("outer"));
    resp
}

async fn render_movie_list(state: &AppState, search: &str) -> AppResult<Html<String>> {
    let movies = state.movies.get_movies(search).await?;
    let genres = state.movies.get_genres().await?;

    let cards: Vec<MovieCard> =
        movies.into_iter().map(|item| MovieCard::new(item, &genres)).collect();
    Ok(Html(templates::movie_list_fragment(&cards)))
}
