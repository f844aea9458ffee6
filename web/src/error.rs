use repo_finder_core::ApiError;

/// Everything that can go wrong while talking to GitHub.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Connection failures, timeouts and unreadable bodies.
    #[error("could not reach GitHub: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ApiError::NotFound))
    }
}
