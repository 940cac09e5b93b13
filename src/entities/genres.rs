//! Raw row projection of the `genres` table, not a SeaORM entity.

use sea_orm::{FromQueryResult, Value};

use crate::models::Genre;

pub const SELECT_ALL: &str = "SELECT id, name FROM genres ORDER BY rowid";
pub const INSERT: &str = "INSERT INTO genres (id, name) VALUES (?, ?)";

#[derive(Clone, Debug, PartialEq, FromQueryResult)]
pub struct Model {
    pub id: i32,
    pub name: String,
}

impl From<Model> for Genre {
    fn from(row: Model) -> Self {
        Self { id: row.id, name: row.name }
    }
}

pub fn insert_values(genre: &Genre) -> Vec<Value> {
    vec![genre.id.into(), genre.name.clone().into()]
}
