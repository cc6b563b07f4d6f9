//! Infrastructure adapters for cinesearch.

pub mod cache;
pub mod db;
pub mod fs;
pub mod omdb;

pub use cache::InMemoryMovieCache;
pub use db::executor::DieselSqliteExecutor;
pub use db::mappers::MovieRowMapper;
pub use db::pool::{init_db_pool, DbPool};
pub use db::repositories::DieselMovieCache;
pub use fs::DirsAppDirsAdapter;
pub use omdb::OmdbClient;

/// The SQLite cache as wired in production.
pub type SqliteMovieCache = DieselMovieCache<DieselSqliteExecutor, MovieRowMapper>;

/// Open (creating and migrating if needed) the SQLite cache at `database_url`.
pub fn open_sqlite_cache(database_url: &str) -> anyhow::Result<SqliteMovieCache> {
    let pool = init_db_pool(database_url)?;
    Ok(DieselMovieCache::new(
        DieselSqliteExecutor::new(pool),
        MovieRowMapper,
    ))
}
