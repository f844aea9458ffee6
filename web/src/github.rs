//! Async GitHub service: executes core-built requests over `reqwest`.
//!
//! The core decides what to send and what a response means; this module only
//! moves bytes and remembers successful results for a while. Failures are
//! returned to the caller as-is and never cached.

use log::{debug, warn};
use repo_finder_core::{
    GitHubClient, HttpMethod, HttpRequest, HttpResponse, Repository, SearchResponse,
};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::Error;

pub struct GitHub {
    client: GitHubClient,
    http: reqwest::Client,
    searches: TtlCache<SearchResponse>,
    repositories: TtlCache<Repository>,
}

impl GitHub {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let mut client = GitHubClient::new(&config.api_base);
        if let Some(token) = config.token() {
            client = client.with_token(token);
        }
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            http,
            searches: TtlCache::new(config.search_cache_ttl(), config.cache_capacity),
            repositories: TtlCache::new(config.repository_cache_ttl(), config.cache_capacity),
        })
    }

    /// Search repositories, most starred first. A blank query yields an
    /// empty page without contacting GitHub.
    pub async fn search_repositories(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<SearchResponse, Error> {
        let Some(req) = self.client.build_search_repositories(query, page, per_page) else {
            return Ok(SearchResponse::empty());
        };

        if let Some(cached) = self.searches.get(&req.url).await {
            debug!("cache hit: {}", req.url);
            return Ok(cached);
        }

        let response = self.execute(&req).await?;
        let result = self
            .client
            .parse_search_repositories(response, per_page)
            .inspect_err(|e| warn!("search for {query:?} failed: {e}"))?;

        self.searches.insert(req.url, result.clone()).await;
        Ok(result)
    }

    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        let req = self.client.build_get_repository(owner, repo)?;

        if let Some(cached) = self.repositories.get(&req.url).await {
            debug!("cache hit: {}", req.url);
            return Ok(cached);
        }

        let response = self.execute(&req).await?;
        let repository = self
            .client
            .parse_get_repository(response)
            .inspect_err(|e| warn!("lookup of {owner}/{repo} failed: {e}"))?;

        self.repositories.insert(req.url, repository.clone()).await;
        Ok(repository)
    }

    async fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, Error> {
        debug!("{} {}", req.method.as_str(), req.url);

        let mut builder = match req.method {
            HttpMethod::Get => self.http.get(&req.url),
        };
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .send()
            .await
            .inspect_err(|e| warn!("request to {} failed: {e}", req.url))?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}
