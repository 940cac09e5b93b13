pub mod genres;
pub mod movies;
