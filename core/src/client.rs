//! Stateless HTTP request builder and response parser for the GitHub API.
//!
//! # Design
//! `GitHubClient` holds the API base URL and an optional bearer token and
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Repository, SearchResponse};

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Page size used by the search page.
pub const DEFAULT_PER_PAGE: u32 = 30;

const ACCEPT: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = "repo-finder";

/// Synchronous, stateless client for the GitHub REST API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a personal access token. Blank tokens are ignored.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.trim().is_empty() { None } else { Some(token) };
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build a repository search sorted by stars, most starred first.
    ///
    /// Returns `None` for an empty or whitespace-only query: there is nothing
    /// to ask GitHub, and the caller should use `SearchResponse::empty()`.
    pub fn build_search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Option<HttpRequest> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        Some(HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}/search/repositories?q={}&page={page}&per_page={per_page}&sort=stars&order=desc",
                self.base_url,
                urlencoding::encode(query),
            ),
            headers: self.headers(),
        })
    }

    /// Build a single-repository lookup.
    ///
    /// Segments that a URL parser would collapse (`.`, `..`) or drop (empty)
    /// cannot name a repository and are answered with `ApiError::NotFound`
    /// without producing a request.
    pub fn build_get_repository(&self, owner: &str, repo: &str) -> Result<HttpRequest, ApiError> {
        if !is_path_segment(owner) || !is_path_segment(repo) {
            return Err(ApiError::NotFound);
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}/repos/{}/{}",
                self.base_url,
                urlencoding::encode(owner),
                urlencoding::encode(repo),
            ),
            headers: self.headers(),
        })
    }

    /// Parse a search response. `per_page` is the page size that was
    /// requested; a page holding more items than that is rejected.
    pub fn parse_search_repositories(
        &self,
        response: HttpResponse,
        per_page: u32,
    ) -> Result<SearchResponse, ApiError> {
        check_status(&response)?;
        let result: SearchResponse = decode(&response.body)?;
        if result.items.len() > per_page as usize {
            return Err(ApiError::Validation {
                message: format!(
                    "search returned {} items for a page size of {per_page}",
                    result.items.len()
                ),
            });
        }
        Ok(result)
    }

    pub fn parse_get_repository(&self, response: HttpResponse) -> Result<Repository, ApiError> {
        if response.status == 404 {
            return Err(ApiError::NotFound);
        }
        check_status(&response)?;
        decode(&response.body)
    }

    fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![
            ("accept".to_string(), ACCEPT.to_string()),
            ("user-agent".to_string(), USER_AGENT.to_string()),
        ];
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}

/// Map a non-2xx response to `ApiError::Api`, preferring the message GitHub
/// put in the body.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = upstream_message(&response.body)
        .unwrap_or_else(|| format!("GitHub API error (status: {})", response.status));
    Err(ApiError::Api {
        status: response.status,
        message,
    })
}

fn is_path_segment(segment: &str) -> bool {
    !matches!(segment, "" | "." | "..")
}

fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value.get("message")?.as_str()?.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Validation {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = r#"{
        "id": 1,
        "name": "test-repo",
        "full_name": "owner/test-repo",
        "owner": {"login": "owner", "avatar_url": "https://example.com/avatar.jpg"},
        "description": "Test repository",
        "language": "TypeScript",
        "stargazers_count": 100,
        "watchers_count": 50,
        "forks_count": 10,
        "open_issues_count": 5,
        "html_url": "https://github.com/owner/test-repo",
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "default_branch": "main"
    }"#;

    fn client() -> GitHubClient {
        GitHubClient::new("http://localhost:4000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn build_search_produces_sorted_paged_request() {
        let req = client().build_search_repositories("tokio", 2, 30).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://localhost:4000/search/repositories?q=tokio&page=2&per_page=30&sort=stars&order=desc"
        );
        assert_eq!(req.header("accept"), Some("application/vnd.github.v3+json"));
        assert_eq!(req.header("user-agent"), Some("repo-finder"));
        assert!(req.header("authorization").is_none());
    }

    #[test]
    fn build_search_encodes_and_trims_query() {
        let req = client()
            .build_search_repositories("  web framework language:rust ", 1, 30)
            .unwrap();
        assert!(req
            .url
            .contains("q=web%20framework%20language%3Arust&page=1"));
    }

    #[test]
    fn build_search_blank_query_is_none() {
        assert!(client().build_search_repositories("", 1, 30).is_none());
        assert!(client().build_search_repositories(" \t\n", 1, 30).is_none());
    }

    #[test]
    fn build_get_repository_produces_correct_request() {
        let req = client().build_get_repository("rust-lang", "rust").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:4000/repos/rust-lang/rust");
    }

    #[test]
    fn build_get_repository_encodes_segments() {
        let req = client().build_get_repository("a/b", "c d").unwrap();
        assert_eq!(req.url, "http://localhost:4000/repos/a%2Fb/c%20d");
    }

    #[test]
    fn build_get_repository_rejects_dot_segments() {
        let c = client();
        for (owner, repo) in [("..", "rate_limit"), (".", "rust"), ("rust-lang", ".."), ("", "x")] {
            assert_eq!(
                c.build_get_repository(owner, repo),
                Err(ApiError::NotFound),
                "{owner}/{repo}"
            );
        }
        // Dots inside a name are ordinary characters.
        let req = c.build_get_repository("a.b", ".github").unwrap();
        assert_eq!(req.url, "http://localhost:4000/repos/a.b/.github");
    }

    #[test]
    fn token_adds_bearer_header() {
        let req = client()
            .with_token("ghp_abcdefghijklmnopqrstuvwxyz")
            .build_get_repository("o", "r")
            .unwrap();
        assert_eq!(
            req.header("authorization"),
            Some("Bearer ghp_abcdefghijklmnopqrstuvwxyz")
        );
    }

    #[test]
    fn blank_token_is_ignored() {
        let c = client().with_token("   ");
        assert!(!c.has_token());
        assert!(c
            .build_get_repository("o", "r")
            .unwrap()
            .header("authorization")
            .is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let c = GitHubClient::new("https://api.github.com/");
        assert_eq!(
            c.build_get_repository("o", "r").unwrap().url,
            "https://api.github.com/repos/o/r"
        );
    }

    #[test]
    fn parse_get_repository_success() {
        let repo = client().parse_get_repository(response(200, REPO)).unwrap();
        assert_eq!(repo.full_name, "owner/test-repo");
        assert_eq!(repo.owner.login, "owner");
        assert_eq!(repo.language.as_deref(), Some("TypeScript"));
        assert_eq!(repo.stargazers_count, 100);
    }

    #[test]
    fn parse_get_repository_accepts_null_description() {
        let body = REPO.replace(r#""Test repository""#, "null");
        let repo = client().parse_get_repository(response(200, &body)).unwrap();
        assert!(repo.description.is_none());
    }

    #[test]
    fn parse_get_repository_not_found() {
        let err = client()
            .parse_get_repository(response(404, r#"{"message":"Not Found"}"#))
            .unwrap_err();
        assert_eq!(err, ApiError::NotFound);
    }

    #[test]
    fn parse_get_repository_server_error() {
        let err = client()
            .parse_get_repository(response(500, "internal error"))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Api {
                status: 500,
                message: "GitHub API error (status: 500)".to_string()
            }
        );
    }

    #[test]
    fn parse_get_repository_forbidden_uses_upstream_message() {
        let err = client()
            .parse_get_repository(response(403, r#"{"message":"API rate limit exceeded"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 403, ref message } if message == "API rate limit exceeded"));
    }

    #[test]
    fn parse_get_repository_missing_id_is_validation_error() {
        let body = REPO.replace(r#""id": 1,"#, "");
        let err = client().parse_get_repository(response(200, &body)).unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn parse_get_repository_missing_nullable_key_is_validation_error() {
        let body = REPO.replace(r#""description": "Test repository","#, "");
        let err = client().parse_get_repository(response(200, &body)).unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn parse_get_repository_negative_counter_is_validation_error() {
        let body = REPO.replace(r#""forks_count": 10"#, r#""forks_count": -1"#);
        let err = client().parse_get_repository(response(200, &body)).unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn parse_search_success() {
        let body = format!(r#"{{"total_count":1,"incomplete_results":false,"items":[{REPO}]}}"#);
        let result = client()
            .parse_search_repositories(response(200, &body), 30)
            .unwrap();
        assert_eq!(result.total_count, 1);
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "test-repo");
    }

    #[test]
    fn parse_search_404_is_api_error_not_not_found() {
        let err = client()
            .parse_search_repositories(response(404, "{}"), 30)
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Api {
                status: 404,
                message: "GitHub API error (status: 404)".to_string()
            }
        );
    }

    #[test]
    fn parse_search_too_many_items_is_validation_error() {
        let body = format!(
            r#"{{"total_count":2,"incomplete_results":false,"items":[{REPO},{REPO}]}}"#
        );
        let err = client()
            .parse_search_repositories(response(200, &body), 1)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn parse_search_bad_json() {
        let err = client()
            .parse_search_repositories(response(200, "not json"), 30)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn blank_upstream_message_is_synthesized() {
        let err = client()
            .parse_search_repositories(response(422, r#"{"message":"  "}"#), 30)
            .unwrap_err();
        assert_eq!(err.to_string(), "GitHub API error (status: 422)");
        assert_eq!(err.status(), Some(422));
    }
}
