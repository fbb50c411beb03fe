//! Data models shared by the proxy and the reader.
//!
//! This module defines the wire types exchanged with NewsAPI and with the
//! proxy's own clients:
//! - [`Article`]: A single headline as returned by NewsAPI
//! - [`ArticleSource`]: The outlet that published an article
//! - [`PageResult`]: One page of articles plus the match count
//! - [`Favorite`]: A saved article snapshot persisted by the reader
//!
//! Field names follow NewsAPI's camelCase JSON schema through
//! `#[serde(rename_all = "camelCase")]`, so the proxy can pass upstream
//! payloads through without reshaping them.

use serde::{Deserialize, Serialize};

/// Number of articles NewsAPI is asked for per page.
pub const PAGE_SIZE: u32 = 12;

/// A news article as returned by the upstream `/v2/everything` endpoint.
///
/// Articles are immutable once fetched; the canonical `url` is their identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The headline.
    pub title: String,
    /// Short summary. NewsAPI sends `null` for some outlets.
    #[serde(default)]
    pub description: Option<String>,
    /// Lead image, when the outlet provides one.
    #[serde(default)]
    pub url_to_image: Option<String>,
    /// Canonical article URL.
    pub url: String,
    #[serde(default)]
    pub author: Option<String>,
    /// RFC 3339 publish timestamp.
    pub published_at: String,
    pub source: ArticleSource,
    /// Truncated body excerpt.
    #[serde(default)]
    pub content: Option<String>,
}

/// The outlet that published an [`Article`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ArticleSource {
    /// NewsAPI's slug for the outlet (e.g. `"reuters"`), absent for long-tail sources.
    #[serde(default)]
    pub id: Option<String>,
    /// Human readable outlet name.
    #[serde(default)]
    pub name: String,
}

/// One page of results for a single (query, page) combination.
///
/// After the proxy's source filter runs, `total_results` equals
/// `articles.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<Article>,
}

fn default_status() -> String {
    "ok".to_string()
}

impl PageResult {
    /// True when the upstream found nothing at all for the query.
    pub fn is_empty_result(&self) -> bool {
        self.articles.is_empty() && self.total_results == 0
    }
}

/// A saved article, keyed by its URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub url: String,
    pub article: Article,
    /// Epoch milliseconds at which the article was saved.
    pub saved_at: i64,
}

/// JSON error body returned by the proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
