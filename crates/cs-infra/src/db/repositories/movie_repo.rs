use async_trait::async_trait;
use diesel::prelude::*;
use tokio::sync::watch;

use cs_core::movie::MovieSummary;
use cs_core::ports::{MovieCacheError, MovieCachePort};
use cs_core::MovieId;

use crate::db::models::{MovieRow, NewMovieRow};
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::movies::dsl::*;

/// SQLite-backed [`MovieCachePort`].
///
/// Keeps the favorites feed in a watch channel and refreshes it after every
/// successful write, so subscribers always see the latest stored set.
pub struct DieselMovieCache<E, M> {
    executor: E,
    mapper: M,
    favorites_tx: watch::Sender<Vec<MovieSummary>>,
}

impl<E, M> DieselMovieCache<E, M>
where
    E: DbExecutor,
    M: InsertMapper<MovieSummary, NewMovieRow> + RowMapper<MovieRow, MovieSummary>,
{
    pub fn new(executor: E, mapper: M) -> Self {
        let (favorites_tx, _) = watch::channel(Vec::new());
        let cache = Self {
            executor,
            mapper,
            favorites_tx,
        };
        cache.refresh_favorites();
        cache
    }

    fn load_rows(&self, rows: Vec<MovieRow>) -> anyhow::Result<Vec<MovieSummary>> {
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let movie = self.mapper.to_domain(&row).map_err(|e| {
                anyhow::anyhow!("Failed to map movie row {}: {}", row.imdb_id, e)
            })?;
            result.push(movie);
        }
        Ok(result)
    }

    fn query_favorites(&self) -> Result<Vec<MovieSummary>, MovieCacheError> {
        self.executor
            .run(|conn| {
                let rows = movies
                    .filter(is_favorite.eq(true))
                    .order((search_term.asc(), search_rank.asc()))
                    .select(MovieRow::as_select())
                    .load::<MovieRow>(conn)?;
                self.load_rows(rows)
            })
            .map_err(storage_error)
    }

    fn refresh_favorites(&self) {
        match self.query_favorites() {
            Ok(favorites) => {
                self.favorites_tx.send_replace(favorites);
            }
            Err(e) => tracing::warn!(error = %e, "failed to refresh favorites feed"),
        }
    }
}

fn storage_error(e: anyhow::Error) -> MovieCacheError {
    MovieCacheError::Storage(e.to_string())
}

/// Upsert one row. The favorite flag of an existing row is left alone: only
/// `set_favorite` changes it, so a stale snapshot can never clear it. With
/// `rank` unset, an existing row keeps its position in its result list.
fn upsert_row(
    conn: &mut SqliteConnection,
    row: &NewMovieRow,
    rank: Option<i32>,
) -> QueryResult<usize> {
    let insert = diesel::insert_into(movies).values(row).on_conflict(imdb_id).do_update();
    let changes = (
        title.eq(&row.title),
        year.eq(&row.year),
        media_type.eq(&row.media_type),
        poster.eq(&row.poster),
        search_term.eq(&row.search_term),
        details_json.eq(&row.details_json),
        updated_at.eq(row.updated_at),
    );
    match rank {
        Some(rank) => insert.set((changes, search_rank.eq(rank))).execute(conn),
        None => insert.set(changes).execute(conn),
    }
}

#[async_trait]
impl<E, M> MovieCachePort for DieselMovieCache<E, M>
where
    E: DbExecutor,
    M: InsertMapper<MovieSummary, NewMovieRow> + RowMapper<MovieRow, MovieSummary> + Send + Sync,
{
    async fn upsert(&self, movie: MovieSummary) -> Result<(), MovieCacheError> {
        let row = self.mapper.to_row(&movie).map_err(storage_error)?;

        self.executor
            .run(move |conn| {
                upsert_row(conn, &row, None)?;
                Ok(())
            })
            .map_err(storage_error)?;

        self.refresh_favorites();
        Ok(())
    }

    async fn upsert_many(&self, batch: Vec<MovieSummary>) -> Result<(), MovieCacheError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut rows = Vec::with_capacity(batch.len());
        for (rank, movie) in batch.iter().enumerate() {
            let mut row = self.mapper.to_row(movie).map_err(storage_error)?;
            row.search_rank = rank as i32;
            rows.push(row);
        }

        self.executor
            .run(move |conn| {
                conn.transaction::<_, diesel::result::Error, _>(|conn| {
                    for row in &rows {
                        upsert_row(conn, row, Some(row.search_rank))?;
                    }
                    Ok(())
                })?;
                Ok(())
            })
            .map_err(storage_error)?;

        self.refresh_favorites();
        Ok(())
    }

    async fn find_by_id(&self, movie_id: &MovieId) -> Result<Option<MovieSummary>, MovieCacheError> {
        let id_value = movie_id.as_str().to_string();
        self.executor
            .run(move |conn| {
                let row = movies
                    .filter(imdb_id.eq(&id_value))
                    .select(MovieRow::as_select())
                    .first::<MovieRow>(conn)
                    .optional()?;

                match row {
                    Some(r) => Ok(Some(self.mapper.to_domain(&r)?)),
                    None => Ok(None),
                }
            })
            .map_err(storage_error)
    }

    async fn find_by_ids(&self, ids: &[MovieId]) -> Result<Vec<MovieSummary>, MovieCacheError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_values: Vec<String> = ids.iter().map(|i| i.as_str().to_string()).collect();
        self.executor
            .run(move |conn| {
                let rows = movies
                    .filter(imdb_id.eq_any(id_values))
                    .select(MovieRow::as_select())
                    .load::<MovieRow>(conn)?;
                self.load_rows(rows)
            })
            .map_err(storage_error)
    }

    async fn find_by_search_term(
        &self,
        term: &str,
    ) -> Result<Vec<MovieSummary>, MovieCacheError> {
        let term_value = term.to_string();
        self.executor
            .run(move |conn| {
                let rows = movies
                    .filter(search_term.eq(&term_value))
                    .order(search_rank.asc())
                    .select(MovieRow::as_select())
                    .load::<MovieRow>(conn)?;
                self.load_rows(rows)
            })
            .map_err(storage_error)
    }

    async fn list_favorites(&self) -> Result<Vec<MovieSummary>, MovieCacheError> {
        self.query_favorites()
    }

    fn subscribe_favorites(&self) -> watch::Receiver<Vec<MovieSummary>> {
        self.favorites_tx.subscribe()
    }

    async fn set_favorite(&self, movie_id: &MovieId, favorite: bool) -> Result<(), MovieCacheError> {
        let id_value = movie_id.as_str().to_string();
        let now = chrono::Utc::now().timestamp_millis();
        let affected = self
            .executor
            .run(move |conn| {
                let affected = diesel::update(movies.filter(imdb_id.eq(&id_value)))
                    .set((is_favorite.eq(favorite), updated_at.eq(now)))
                    .execute(conn)?;
                Ok(affected)
            })
            .map_err(storage_error)?;

        if affected == 0 {
            return Err(MovieCacheError::NotFound);
        }

        self.refresh_favorites();
        Ok(())
    }
}
