//! A local stand-in for the two GitHub REST endpoints the site uses.
//!
//! Serves a fixed, seeded set of repositories and a few reserved names that
//! trigger failure modes (rate limiting, server errors, malformed payloads).
//! Every request is counted so tests can assert how often the upstream was hit.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

/// Searching for this answers 403 with a rate-limit message.
pub const RATE_LIMITED_QUERY: &str = "rate-limited";
/// Searching for this reports 30 000 matches, more than GitHub will serve.
pub const HUGE_QUERY: &str = "everything";
/// Any `/repos/broken/{repo}` answers 200 with a payload missing `id`.
pub const BROKEN_OWNER: &str = "broken";
/// Any `/repos/failing/{repo}` answers 500 with a plain-text body.
pub const FAILING_OWNER: &str = "failing";

const SEARCH_CAP: u32 = 1000;
const MAX_PER_PAGE: u32 = 100;
const WIDGETS: u64 = 75;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub watchers_count: u64,
    pub forks_count: u64,
    pub open_issues_count: u64,
    pub html_url: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort: Option<String>,
}

/// Shared server state. Cloning shares the counters.
#[derive(Clone)]
pub struct MockState {
    repositories: Arc<Vec<Repository>>,
    hits: Arc<AtomicUsize>,
    last_authorization: Arc<RwLock<Option<String>>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            repositories: Arc::new(seed()),
            hits: Arc::new(AtomicUsize::new(0)),
            last_authorization: Arc::new(RwLock::new(None)),
        }
    }
}

impl MockState {
    /// Requests served so far, successful or not.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// `Authorization` header of the most recent request.
    pub async fn last_authorization(&self) -> Option<String> {
        self.last_authorization.read().await.clone()
    }

    async fn record(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        *self.last_authorization.write().await = auth;
    }
}

pub fn app() -> Router {
    app_with(MockState::default())
}

pub fn app_with(state: MockState) -> Router {
    Router::new()
        .route("/search/repositories", get(search_repositories))
        .route("/repos/{owner}/{repo}", get(get_repository))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockState::default()).await
}

pub async fn run_with(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

fn message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "message": message,
            "documentation_url": "https://docs.github.com/rest",
        })),
    )
        .into_response()
}

async fn search_repositories(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    state.record(&headers).await;

    let q = params.q.unwrap_or_default();
    let q = q.trim();
    if q.is_empty() {
        return message(StatusCode::UNPROCESSABLE_ENTITY, "Validation Failed");
    }
    if q == RATE_LIMITED_QUERY {
        return message(
            StatusCode::FORBIDDEN,
            "API rate limit exceeded for 127.0.0.1.",
        );
    }

    let per_page = params.per_page.unwrap_or(30).clamp(1, MAX_PER_PAGE);
    let page = params.page.unwrap_or(1).max(1);
    let offset = (page - 1).saturating_mul(per_page);
    if offset >= SEARCH_CAP {
        return message(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Only the first 1000 search results are available",
        );
    }

    if q == HUGE_QUERY {
        let items = state
            .repositories
            .iter()
            .cycle()
            .skip(offset as usize)
            .take(per_page as usize)
            .cloned()
            .collect();
        return Json(SearchResponse {
            total_count: 30_000,
            incomplete_results: true,
            items,
        })
        .into_response();
    }

    let needle = q.to_lowercase();
    let mut matches: Vec<&Repository> = state
        .repositories
        .iter()
        .filter(|r| {
            r.full_name.to_lowercase().contains(&needle)
                || r
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .collect();
    if params.sort.as_deref() == Some("stars") {
        matches.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    }

    let total_count = matches.len() as u64;
    let items = matches
        .into_iter()
        .skip(offset as usize)
        .take(per_page as usize)
        .cloned()
        .collect();
    Json(SearchResponse {
        total_count,
        incomplete_results: false,
        items,
    })
    .into_response()
}

async fn get_repository(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    state.record(&headers).await;

    if owner == BROKEN_OWNER {
        return Json(json!({ "name": repo, "full_name": format!("{owner}/{repo}") }))
            .into_response();
    }
    if owner == FAILING_OWNER {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }

    let full_name = format!("{owner}/{repo}").to_lowercase();
    match state
        .repositories
        .iter()
        .find(|r| r.full_name.to_lowercase() == full_name)
    {
        Some(found) => Json(found.clone()).into_response(),
        None => message(StatusCode::NOT_FOUND, "Not Found"),
    }
}

fn repository(
    id: u64,
    owner: &str,
    name: &str,
    description: Option<&str>,
    language: Option<&str>,
    stars: u64,
) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        owner: Owner {
            login: owner.to_string(),
            avatar_url: format!("https://avatars.githubusercontent.com/u/{id}?v=4"),
        },
        description: description.map(str::to_string),
        language: language.map(str::to_string),
        stargazers_count: stars,
        watchers_count: stars,
        forks_count: stars / 10,
        open_issues_count: stars / 100,
        html_url: format!("https://github.com/{owner}/{name}"),
        created_at: "2015-05-14T19:18:11Z".to_string(),
        updated_at: "2024-03-02T08:15:27Z".to_string(),
    }
}

fn seed() -> Vec<Repository> {
    let mut repos = vec![
        repository(
            724712,
            "rust-lang",
            "rust",
            Some("Empowering everyone to build reliable and efficient software."),
            Some("Rust"),
            98_123,
        ),
        repository(
            64292224,
            "tokio-rs",
            "tokio",
            Some("A runtime for writing reliable asynchronous applications with Rust."),
            Some("Rust"),
            27_456,
        ),
        repository(
            389362658,
            "tokio-rs",
            "axum",
            Some("Ergonomic and modular web framework built with Tokio, Tower, and Hyper"),
            Some("Rust"),
            19_870,
        ),
        repository(
            20413434,
            "serde-rs",
            "serde",
            Some("Serialization framework for Rust"),
            Some("Rust"),
            9_210,
        ),
        repository(1296269, "octocat", "Hello-World", None, None, 2_601),
    ];
    let languages = ["Rust", "Go", "TypeScript"];
    repos.extend((1..=WIDGETS).map(|n| {
        let name = format!("widget-{n}");
        let description = format!("Widget number {n}");
        repository(
            1_000_000 + n,
            "acme",
            &name,
            Some(&description),
            Some(languages[(n % 3) as usize]),
            5_000 - n * 10,
        )
    }));
    repos
}
