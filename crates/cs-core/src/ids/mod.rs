//! ID type wrappers for type safety.

mod id_macro;
pub mod movie_id;

pub use movie_id::MovieId;
