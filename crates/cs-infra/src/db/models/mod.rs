pub mod movie_row;

pub use movie_row::{MovieRow, NewMovieRow};
