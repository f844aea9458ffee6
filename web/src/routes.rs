use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use log::warn;
use repo_finder_core::{pagination::max_page, Pagination, DEFAULT_PER_PAGE};
use serde::Deserialize;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::github::GitHub;
use crate::views::{self, SearchOutcome, Site};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    script-src 'self'; \
    style-src 'self'; \
    img-src 'self' data: https://avatars.githubusercontent.com; \
    font-src 'self'; \
    connect-src 'self'; \
    frame-ancestors 'none'";
const PERMISSIONS_POLICY: &str = "camera=(), microphone=(), geolocation=(), interest-cohort=()";

const STYLESHEET: &str = include_str!("../assets/app.css");
const SCRIPT: &str = include_str!("../assets/app.js");

#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GitHub>,
    pub site: Arc<Site>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(search))
        .route("/repository/{owner}/{repo}", get(repository))
        .route("/assets/app.css", get(stylesheet))
        .route("/assets/app.js", get(script))
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static(PERMISSIONS_POLICY),
        ))
        .with_state(state)
}

/// Positive page numbers only, capped at the last page GitHub serves.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&page| page > 0)
        .unwrap_or(1)
        .min(max_page(DEFAULT_PER_PAGE))
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.as_deref().unwrap_or_default().trim();
    let page = parse_page(params.page.as_deref());

    if query.is_empty() {
        return Html(views::search_page(&state.site, "", 1, &SearchOutcome::Prompt)).into_response();
    }

    match state
        .github
        .search_repositories(query, page, DEFAULT_PER_PAGE)
        .await
    {
        Ok(result) => {
            let pagination = Pagination::new(page, result.total_count, DEFAULT_PER_PAGE);
            let outcome = SearchOutcome::Results { result, pagination };
            Html(views::search_page(&state.site, query, page, &outcome)).into_response()
        }
        Err(err) => {
            let outcome = SearchOutcome::Failed {
                message: err.to_string(),
            };
            (
                StatusCode::BAD_GATEWAY,
                Html(views::search_page(&state.site, query, page, &outcome)),
            )
                .into_response()
        }
    }
}

async fn repository(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    match state.github.get_repository(&owner, &repo).await {
        Ok(repository) => Html(views::repository_page(&state.site, &repository)).into_response(),
        Err(err) if err.is_not_found() => (
            StatusCode::NOT_FOUND,
            Html(views::repository_not_found_page(&state.site, &owner, &repo)),
        )
            .into_response(),
        Err(err) => {
            warn!("rendering error page for {owner}/{repo}: {err}");
            let path = views::repository_href(&owner, &repo);
            (
                StatusCode::BAD_GATEWAY,
                Html(views::error_page(&state.site, &path, &err.to_string())),
            )
                .into_response()
        }
    }
}

async fn stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLESHEET,
    )
}

async fn script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        SCRIPT,
    )
}

async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(views::not_found_page(&state.site, uri.path())),
    )
        .into_response()
}
