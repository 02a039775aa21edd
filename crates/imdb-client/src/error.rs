//! Errors that can occur while resolving IMDb detail pages.

use data_loader::MovieId;
use thiserror::Error;

/// The page for one identifier could not be fetched
///
/// Messages are kept as strings so results can cross worker threads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Request to {url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("Could not read body of {url}: {message}")]
    Body { url: String, message: String },
}

/// Resolution of one identifier failed as a whole
///
/// Field-level problems never show up here; they are replaced by sentinels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Fetch failed for movie {movie_id}: {source}")]
    Fetch {
        movie_id: MovieId,
        #[source]
        source: FetchError,
    },

    #[error("No title found on the detail page for movie {movie_id}")]
    MissingTitle { movie_id: MovieId },
}

impl ResolveError {
    pub fn movie_id(&self) -> MovieId {
        match self {
            ResolveError::Fetch { movie_id, .. } | ResolveError::MissingTitle { movie_id } => {
                *movie_id
            }
        }
    }
}
