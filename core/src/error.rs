//! Error types for the GitHub API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because the detail page renders a
//! different view for "this repository does not exist" than for "GitHub
//! answered with an unexpected status". All other non-2xx responses land in
//! `Api` with the status and a human-readable message. `Validation` covers a
//! 2xx response whose payload does not have the expected shape.

/// Errors returned by `GitHubClient` parse methods.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The requested repository does not exist (single lookups only).
    #[error("repository not found")]
    NotFound,

    /// The API returned a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The API returned 2xx but the body does not match the expected shape.
    #[error("unexpected response from GitHub: {message}")]
    Validation { message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Validation { .. } => None,
        }
    }
}
