use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieListItem {
    pub title_en: String,
    pub overview: String,
    pub vote_average: f32,
    pub genre_ids: Vec<i32>,
    pub poster_src: String,
    pub release_year: i32,
}

/// A list item prepared for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MovieCard {
    pub title_en: String,
    pub overview: String,
    pub vote_average: f64,
    pub genres: Vec<String>,
    pub poster_src: String,
    pub release_year: i32,
}

impl MovieCard {
    /// Resolves genre ids against `genres`; ids with no match are dropped.
    pub fn new(item: MovieListItem, genres: &[Genre]) -> Self {
        let names = item
            .genre_ids
            .iter()
            .filter_map(|id| genres.iter().find(|g| g.id == *id))
            .map(|g| g.name.clone())
            .collect();

        Self {
            title_en: item.title_en,
            overview: item.overview,
            vote_average: round_vote(item.vote_average),
            genres: names,
            poster_src: item.poster_src,
            release_year: item.release_year,
        }
    }
}

/// Rounds to one decimal place, half away from zero.
pub fn round_vote(vote: f32) -> f64 {
    (f64::from(vote) * 10.0).round() / 10.0
}
