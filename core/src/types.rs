//! Domain DTOs for the GitHub REST API.
//!
//! These mirror the subset of GitHub's `repository` object the site renders.
//! Unknown keys are ignored; missing keys are an error. `description` and
//! `language` must be present but may be `null`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

/// A single repository returned by `/repos/{owner}/{repo}` or inside a
/// search result page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    #[serde(deserialize_with = "Option::deserialize")]
    pub description: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub html_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// One page of `/search/repositories` results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

impl SearchResponse {
    /// The result of searching for nothing.
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            incomplete_results: false,
            items: Vec::new(),
        }
    }
}
