pub mod movie_mapper;

pub use movie_mapper::MovieRowMapper;
