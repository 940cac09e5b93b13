//! Raw row projection of the `movies` table, not a SeaORM entity.

use sea_orm::{FromQueryResult, Value};

use crate::{cache::genre_ids, models::MovieListItem};

pub const SELECT_ALL: &str = "SELECT title_en, overview, vote_avg, genre_ids_csv, poster_src, release_year \
     FROM movies ORDER BY rowid";
pub const INSERT: &str = "INSERT INTO movies (title_en, overview, vote_avg, genre_ids_csv, poster_src, release_year) \
     VALUES (?, ?, ?, ?, ?, ?)";

#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct Model {
    pub title_en: String,
    pub overview: String,
    pub vote_avg: f64,
    pub genre_ids_csv: String,
    pub poster_src: String,
    pub release_year: i32,
}

impl From<Model> for MovieListItem {
    fn from(row: Model) -> Self {
        Self {
            title_en: row.title_en,
            overview: row.overview,
            vote_average: row.vote_avg as f32,
            genre_ids: genre_ids::decode(&row.genre_ids_csv),
            poster_src: row.poster_src,
            release_year: row.release_year,
        }
    }
}

pub fn insert_values(movie: &MovieListItem) -> Vec<Value> {
    vec![
        movie.title_en.clone().into(),
        movie.overview.clone().into(),
        f64::from(movie.vote_average).into(),
        genre_ids::encode(&movie.genre_ids).into(),
        movie.poster_src.clone().into(),
        movie.release_year.into(),
    ]
}
