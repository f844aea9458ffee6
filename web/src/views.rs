//! Server-rendered HTML.
//!
//! Every value interpolated into markup goes through `text` or `attr`.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use repo_finder_core::{PageItem, Pagination, Repository, SearchResponse};

const SITE_NAME: &str = "GitHub Repository Finder";
const SITE_DESCRIPTION: &str =
    "Search GitHub repositories and browse their details with the GitHub REST API";

/// Site-wide rendering settings.
#[derive(Debug, Clone)]
pub struct Site {
    pub url: String,
    pub show_error_details: bool,
}

/// What the results area of the search page shows.
#[derive(Debug)]
pub enum SearchOutcome {
    /// No query yet.
    Prompt,
    Results {
        result: SearchResponse,
        pagination: Option<Pagination>,
    },
    Failed { message: String },
}

/// `12345` -> `12,345`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// ISO-8601 timestamp -> `YYYY/MM/DD`; anything unparseable is shown as-is.
pub fn format_date(timestamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(timestamp)
        .map(|d| d.format("%Y/%m/%d").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

pub fn search_href(query: &str, page: u32) -> String {
    let q = urlencoding::encode(query);
    if page > 1 {
        format!("/?q={q}&page={page}")
    } else {
        format!("/?q={q}")
    }
}

pub fn repository_href(owner: &str, name: &str) -> String {
    format!(
        "/repository/{}/{}",
        urlencoding::encode(owner),
        urlencoding::encode(name)
    )
}

fn layout(site: &Site, title: &str, path: &str, body: &str) -> String {
    let title = if title.is_empty() {
        SITE_NAME.to_string()
    } else {
        format!("{title} | {SITE_NAME}")
    };
    let canonical = format!("{}{}", site.url, path);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title_text}</title>
<meta name="description" content="{description}">
<meta name="robots" content="index, follow">
<link rel="canonical" href="{canonical}">
<meta property="og:title" content="{title_attr}">
<meta property="og:description" content="{description}">
<meta property="og:type" content="website">
<meta property="og:url" content="{canonical}">
<meta name="twitter:card" content="summary">
<meta name="twitter:title" content="{title_attr}">
<link rel="stylesheet" href="/assets/app.css">
<script src="/assets/app.js" defer></script>
</head>
<body>
<main id="page" class="container">
{body}
</main>
</body>
</html>
"#,
        title_text = text(&title),
        title_attr = attr(&title),
        description = attr(SITE_DESCRIPTION),
        canonical = attr(&canonical),
    )
}

fn search_form(query: &str) -> String {
    format!(
        r#"<form class="search-form" action="/" method="get" role="search">
<input type="search" name="q" value="{}" placeholder="Search repositories..." aria-label="Search repositories" autofocus required>
<button type="submit">Search</button>
</form>"#,
        attr(query)
    )
}

pub fn search_page(site: &Site, query: &str, page: u32, outcome: &SearchOutcome) -> String {
    let results = match outcome {
        SearchOutcome::Prompt => {
            r#"<p class="hint">Enter a keyword to search GitHub repositories.</p>"#.to_string()
        }
        SearchOutcome::Results { result, pagination } => {
            search_results(query, result, pagination.as_ref())
        }
        SearchOutcome::Failed { message } => error_message(message, &search_href(query, page)),
    };

    let body = format!(
        r#"<header class="masthead">
<h1><a href="/">{SITE_NAME}</a></h1>
<p>Search GitHub repositories by keyword.</p>
</header>
{form}
<section id="results" data-search-query="{query}" data-search-page="{page}">
{results}
</section>
<template id="results-skeleton">{results_skeleton}</template>
<template id="detail-skeleton">{detail_skeleton}</template>"#,
        form = search_form(query),
        query = attr(query),
        results_skeleton = results_skeleton(),
        detail_skeleton = repository_skeleton(),
    );

    let title = if query.is_empty() {
        String::new()
    } else {
        format!("{query} - search")
    };
    let path = if query.is_empty() {
        "/".to_string()
    } else {
        search_href(query, page)
    };
    layout(site, &title, &path, &body)
}

fn search_results(query: &str, result: &SearchResponse, pagination: Option<&Pagination>) -> String {
    let mut html = format!(
        r#"<p class="result-count">{} repositories found</p>"#,
        thousands(result.total_count)
    );
    if result.incomplete_results {
        html.push_str(
            r#"<p class="notice">GitHub timed out before finishing this search; results may be incomplete.</p>"#,
        );
    }
    html.push_str(&repository_list(&result.items));
    if let Some(pagination) = pagination {
        html.push_str(&pagination_nav(query, pagination));
    }
    html
}

pub fn repository_list(repositories: &[Repository]) -> String {
    if repositories.is_empty() {
        return r#"<p class="hint">No repositories found.</p>"#.to_string();
    }
    let mut html = String::from(r#"<ul class="repo-list">"#);
    for repository in repositories {
        html.push_str(&repository_card(repository));
    }
    html.push_str("</ul>");
    html
}

fn repository_card(repository: &Repository) -> String {
    let mut meta = String::new();
    if let Some(language) = &repository.language {
        let _ = write!(
            meta,
            r#"<span class="language"><span class="language-dot"></span>{}</span>"#,
            text(language)
        );
    }
    for (icon, label, value) in counters(repository) {
        let _ = write!(
            meta,
            r#"<span title="{label}">{icon} {}</span>"#,
            thousands(value)
        );
    }

    let description = repository
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="description">{}</p>"#, text(d)))
        .unwrap_or_default();

    format!(
        r#"<li><a class="repo-card" href="{href}" data-detail-link>
<img class="avatar" src="{avatar}" alt="{login}" width="48" height="48" loading="lazy">
<div class="repo-body">
<h3 class="repo-name">{full_name}</h3>
{description}
<div class="repo-meta">{meta}</div>
</div>
</a></li>"#,
        href = attr(&repository_href(&repository.owner.login, &repository.name)),
        avatar = attr(&repository.owner.avatar_url),
        login = attr(&repository.owner.login),
        full_name = text(&repository.full_name),
    )
}

fn counters(repository: &Repository) -> [(&'static str, &'static str, u64); 4] {
    [
        ("⭐", "Stars", repository.stargazers_count),
        ("👁", "Watchers", repository.watchers_count),
        ("🍴", "Forks", repository.forks_count),
        ("🐛", "Issues", repository.open_issues_count),
    ]
}

pub fn pagination_nav(query: &str, pagination: &Pagination) -> String {
    let control = |target: Option<u32>, label: &str| match target {
        Some(page) => format!(
            r#"<a class="page-control" href="{}">{label}</a>"#,
            attr(&search_href(query, page))
        ),
        None => format!(r#"<span class="page-control disabled" aria-disabled="true">{label}</span>"#),
    };

    let mut html = String::from(r#"<nav class="pagination" aria-label="Pagination">"#);
    html.push_str(&control(pagination.previous(), "← Previous"));
    html.push_str(r#"<ol class="pages">"#);
    for item in &pagination.items {
        match *item {
            PageItem::Page(page) if pagination.is_current(page) => {
                let _ = write!(
                    html,
                    r#"<li><span class="page current" aria-current="page">{page}</span></li>"#
                );
            }
            PageItem::Page(page) => {
                let _ = write!(
                    html,
                    r#"<li><a class="page" href="{}">{page}</a></li>"#,
                    attr(&search_href(query, page))
                );
            }
            PageItem::Ellipsis => html.push_str(r#"<li><span class="ellipsis">...</span></li>"#),
        }
    }
    html.push_str("</ol>");
    html.push_str(&control(pagination.next(), "Next →"));
    html.push_str("</nav>");
    html
}

fn error_message(message: &str, retry_href: &str) -> String {
    format!(
        r#"<div class="error-panel" role="alert">
<h3>Something went wrong</h3>
<p>{}</p>
<a class="button" href="{}">Try again</a>
</div>"#,
        text(message),
        attr(retry_href)
    )
}

fn results_skeleton() -> String {
    let card = r#"<li class="repo-card skeleton"><div class="avatar bone"></div><div class="repo-body"><div class="bone line wide"></div><div class="bone line"></div><div class="bone-row"><div class="bone chip"></div><div class="bone chip"></div><div class="bone chip"></div></div></div></li>"#;
    format!(r#"<ul class="repo-list" aria-busy="true">{}</ul>"#, card.repeat(5))
}

fn repository_skeleton() -> String {
    format!(
        r#"<div class="bone line narrow"></div>
<article class="repo-detail skeleton" aria-busy="true">
<div class="detail-header"><div class="avatar large bone"></div><div class="repo-body"><div class="bone line wide"></div><div class="bone line"></div></div></div>
<div class="stats">{}</div>
{}
<div class="bone button-bone"></div>
</article>"#,
        r#"<div class="stat bone"></div>"#.repeat(4),
        r#"<div class="bone line row"></div>"#.repeat(3),
    )
}

pub fn repository_page(site: &Site, repository: &Repository) -> String {
    let description = repository
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="description">{}</p>"#, text(d)))
        .unwrap_or_default();

    let mut stats = String::new();
    for (icon, label, value) in counters(repository) {
        let _ = write!(
            stats,
            r#"<div class="stat"><div class="stat-icon">{icon}</div><div class="stat-value">{}</div><div class="stat-label">{label}</div></div>"#,
            thousands(value)
        );
    }

    let mut info = String::new();
    if let Some(language) = &repository.language {
        let _ = write!(
            info,
            r#"<div class="info-row"><dt>Language</dt><dd><span class="language badge"><span class="language-dot"></span>{}</span></dd></div>"#,
            text(language)
        );
    }
    let _ = write!(
        info,
        r#"<div class="info-row"><dt>Created</dt><dd>{}</dd></div><div class="info-row"><dt>Updated</dt><dd>{}</dd></div>"#,
        text(&format_date(&repository.created_at)),
        text(&format_date(&repository.updated_at)),
    );

    let body = format!(
        r#"<a class="back-link" href="/" data-back-link>← Back to search</a>
<article class="repo-detail">
<div class="detail-header">
<img class="avatar large" src="{avatar}" alt="{login}" width="80" height="80">
<div class="repo-body">
<h1>{full_name}</h1>
{description}
</div>
</div>
<div class="stats">{stats}</div>
<dl class="info">{info}</dl>
<a class="button dark" href="{html_url}" target="_blank" rel="noopener noreferrer">View on GitHub</a>
</article>"#,
        avatar = attr(&repository.owner.avatar_url),
        login = attr(&repository.owner.login),
        full_name = text(&repository.full_name),
        html_url = attr(&repository.html_url),
    );

    layout(
        site,
        &repository.full_name,
        &repository_href(&repository.owner.login, &repository.name),
        &body,
    )
}

pub fn repository_not_found_page(site: &Site, owner: &str, repo: &str) -> String {
    let body = r#"<div class="message-card">
<div class="emoji">😢</div>
<h1>Repository not found</h1>
<p>The repository does not exist or is not accessible.</p>
<a class="button" href="/">← Back to home</a>
</div>"#;
    layout(site, "Repository not found", &repository_href(owner, repo), body)
}

pub fn not_found_page(site: &Site, path: &str) -> String {
    let body = r#"<div class="message-card">
<div class="emoji">🔍</div>
<h1>404</h1>
<h2>Page not found</h2>
<p>The page you are looking for does not exist or has moved.</p>
<a class="button dark" href="/">Back to home</a>
</div>"#;
    layout(site, "Page not found", path, body)
}

/// Generic failure page. The upstream message is only shown when the site is
/// configured to expose error details.
pub fn error_page(site: &Site, path: &str, message: &str) -> String {
    let details = if site.show_error_details {
        format!(r#"<pre class="error-details">{}</pre>"#, text(message))
    } else {
        String::new()
    };
    let body = format!(
        r#"<div class="message-card error-card" role="alert">
<div class="emoji">😵</div>
<h1>Something went wrong</h1>
<p>An unexpected error occurred. Please try again.</p>
{details}
<div class="actions">
<a class="button danger" href="{retry}">Try again</a>
<a class="button outline" href="/">Back to home</a>
</div>
</div>"#,
        retry = attr(path),
    );
    layout(site, "Error", path, &body)
}
