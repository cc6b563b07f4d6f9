//! OMDb HTTP adapter for [`MovieApiPort`](cs_core::ports::MovieApiPort).

mod client;
mod dto;

pub use client::OmdbClient;
