use thiserror::Error;

/// Failures of the remote catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MovieApiError {
    /// Unreachable host, timeout, or a body that could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered but reported a failure (non-success status or
    /// an error payload). Carries the service's own message.
    #[error("{0}")]
    Response(String),
}

/// Failures of the local movie cache.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MovieCacheError {
    #[error("movie not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is not available")]
    DataLocalDirUnavailable,
}
