use crate::db::schema::movies;
use diesel::prelude::*;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = movies)]
pub struct MovieRow {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub media_type: String,
    pub poster: String,
    pub search_term: String,
    pub search_rank: i32,
    pub is_favorite: bool,
    pub details_json: Option<String>,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = movies)]
pub struct NewMovieRow {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub media_type: String,
    pub poster: String,
    pub search_term: String,
    pub search_rank: i32,
    pub is_favorite: bool,
    pub details_json: Option<String>,
    pub updated_at: i64,
}
