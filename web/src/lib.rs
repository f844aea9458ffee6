//! Server-rendered GitHub repository search.
//!
//! The `repo_finder_core` crate decides what to ask GitHub and how to read the
//! answer; this crate performs the I/O, caches results briefly, and renders
//! HTML with axum.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::Router;

pub use config::Config;
pub use error::Error;
pub use github::GitHub;
pub use routes::{app, AppState};
pub use views::Site;

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            github: Arc::new(GitHub::new(config)?),
            site: Arc::new(Site {
                url: config.site_url().to_string(),
                show_error_details: config.show_error_details,
            }),
        })
    }
}

/// Build the full router for `config`.
pub fn router(config: &Config) -> Result<Router, Error> {
    Ok(app(AppState::from_config(config)?))
}
