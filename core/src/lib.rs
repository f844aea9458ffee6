//! I/O-free client core for the GitHub repository search API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `GitHubClient` holds only the API base URL and an optional token.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Parsing doubles as response-shape validation: a payload that does not
//!   decode into the DTOs is rejected, never patched up.
//! - `pagination` computes the page window shown under search results.

pub mod client;
pub mod error;
pub mod http;
pub mod pagination;
pub mod types;

pub use client::{GitHubClient, DEFAULT_PER_PAGE, GITHUB_API_BASE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pagination::{PageItem, Pagination, MAX_RESULTS};
pub use types::{Owner, Repository, SearchResponse};
