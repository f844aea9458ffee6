use std::sync::Once;
use std::time::Duration;

use repo_finder_core::GITHUB_API_BASE;

pub const DEFAULT_SITE_URL: &str = "http://localhost:3000";

/// Tokens shorter than this cannot be a valid personal access token.
const MIN_TOKEN_LEN: usize = 20;

static REPORT: Once = Once::new();

#[derive(Debug, Clone, clap::Parser)]
#[command(
    name = "repo-finder",
    version,
    about = "Search GitHub repositories and browse their details"
)]
pub struct Config {
    /// GitHub personal access token. Raises the rate limit from 60 to 5000 requests per hour.
    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Public URL of this site, used for canonical and Open Graph links.
    #[clap(long, env = "SITE_URL")]
    pub site_url: Option<String>,

    /// GitHub REST API base URL.
    #[clap(long, env = "GITHUB_API_BASE", default_value = GITHUB_API_BASE)]
    pub api_base: String,

    #[clap(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[clap(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Seconds a search result page stays fresh.
    #[clap(long, env = "SEARCH_CACHE_TTL", default_value = "300")]
    pub search_cache_ttl: u64,

    /// Seconds a repository detail stays fresh.
    #[clap(long, env = "REPOSITORY_CACHE_TTL", default_value = "600")]
    pub repository_cache_ttl: u64,

    /// Entries each cache holds before evicting.
    #[clap(long, env = "CACHE_CAPACITY", default_value = "1000")]
    pub cache_capacity: usize,

    /// Seconds to wait for GitHub before giving up.
    #[clap(long, env = "REQUEST_TIMEOUT", default_value = "10")]
    pub request_timeout: u64,

    /// Show upstream error messages on the error page.
    #[clap(long, env = "SHOW_ERROR_DETAILS", default_value = "false")]
    pub show_error_details: bool,
}

/// A startup finding about the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: log::Level,
    pub message: String,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn site_url(&self) -> &str {
        self.site_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_SITE_URL)
    }

    pub fn search_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.search_cache_ttl)
    }

    pub fn repository_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.repository_cache_ttl)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut found = Vec::new();

        match self.token() {
            None => found.push(Diagnostic {
                level: log::Level::Warn,
                message: "GITHUB_TOKEN is not set; GitHub limits unauthenticated clients to 60 requests per hour (5000 with a token, see https://github.com/settings/tokens)".to_string(),
            }),
            Some(token) if token.len() < MIN_TOKEN_LEN => found.push(Diagnostic {
                level: log::Level::Error,
                message: "GITHUB_TOKEN does not look like a personal access token".to_string(),
            }),
            Some(_) => {}
        }

        if !self.site_url.as_deref().is_some_and(|u| !u.trim().is_empty()) {
            found.push(Diagnostic {
                level: log::Level::Info,
                message: format!("SITE_URL is not set; using {DEFAULT_SITE_URL}"),
            });
        }

        found
    }

    /// Log `diagnostics` once per process.
    pub fn report_environment(&self) {
        REPORT.call_once(|| {
            for d in self.diagnostics() {
                log::log!(d.level, "{}", d.message);
            }
        });
    }
}
