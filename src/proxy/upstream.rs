//! NewsAPI client with a widening date-window retry.
//!
//! Each proxy request turns into one call to NewsAPI's `/v2/everything`
//! endpoint restricted to the last 7 days. When that window comes back
//! completely empty the same query is retried once over the last 30 days.
//!
//! # Query Shape
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | `apiKey` | the configured credential |
//! | `pageSize` | [`PAGE_SIZE`] |
//! | `page` | requested page |
//! | `from` | today minus the window, `YYYY-MM-DD` |
//! | `sortBy` | `publishedAt` |
//! | `language` | `en` |
//! | `q` | `Philippines` plus the search term or category |

use crate::models::{PAGE_SIZE, PageResult};
use crate::utils::REDACTED;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info, instrument};
use url::Url;

/// Default NewsAPI search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";

/// Every upstream query is anchored on this term.
pub const COUNTRY_TERM: &str = "Philippines";

const USER_AGENT: &str = "NewsReader/1.0";

/// Errors surfaced by [`UpstreamClient`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Daily request limit reached. Please try again tomorrow.")]
    RateLimited,

    #[error("NewsAPI authentication failed. Check your API key.")]
    Unauthorized,

    #[error("NewsAPI error: {reason}")]
    Status { status: StatusCode, reason: String },

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The filter half of a proxy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub page: u32,
    pub search: Option<String>,
    pub categories: Option<String>,
}

impl NewsQuery {
    pub fn new(page: u32, search: Option<String>, categories: Option<String>) -> Self {
        let present = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            page,
            search: present(search),
            categories: present(categories),
        }
    }

    /// Build the `q` parameter. Search takes precedence over categories.
    pub fn search_terms(&self) -> String {
        match (&self.search, &self.categories) {
            (Some(search), _) => format!("{COUNTRY_TERM} {search}"),
            (None, Some(categories)) => format!("{COUNTRY_TERM} {categories}"),
            (None, None) => COUNTRY_TERM.to_string(),
        }
    }
}

/// How far back a query reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Week,
    Month,
}

impl DateWindow {
    pub fn days(self) -> i64 {
        match self {
            DateWindow::Week => 7,
            DateWindow::Month => 30,
        }
    }

    /// First day covered by the window when counting back from `today`.
    pub fn from_date(self, today: NaiveDate) -> NaiveDate {
        today - Duration::days(self.days())
    }
}

/// Thin client for the NewsAPI search endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl UpstreamClient {
    pub fn new(api_key: String, endpoint: Url) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            endpoint,
            api_key,
        })
    }

    /// Assemble the request URL for one window.
    pub fn request_url(&self, query: &NewsQuery, from: NaiveDate) -> Url {
        self.build_url(query, from, &self.api_key)
    }

    /// Same URL as [`request_url`](Self::request_url) with the key swapped for [`REDACTED`].
    pub fn loggable_url(&self, query: &NewsQuery, from: NaiveDate) -> Url {
        self.build_url(query, from, REDACTED)
    }

    fn build_url(&self, query: &NewsQuery, from: NaiveDate, api_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("apiKey", api_key)
            .append_pair("pageSize", &PAGE_SIZE.to_string())
            .append_pair("page", &query.page.to_string())
            .append_pair("from", &from.format("%Y-%m-%d").to_string())
            .append_pair("sortBy", "publishedAt")
            .append_pair("language", "en")
            .append_pair("q", &query.search_terms());
        url
    }

    /// Fetch a page, widening to the 30-day window when the last week is empty.
    #[instrument(level = "info", skip_all, fields(page = query.page))]
    pub async fn fetch(&self, query: &NewsQuery) -> Result<PageResult, UpstreamError> {
        let today = Utc::now().date_naive();
        let page = self.fetch_window(query, DateWindow::Week, today).await?;
        if !page.is_empty_result() {
            return Ok(page);
        }

        info!("No articles found in 7-day window, trying 30 days");
        self.fetch_window(query, DateWindow::Month, today).await
    }

    /// Issue a single request covering `window` days back from `today`.
    #[instrument(level = "debug", skip_all, fields(window = window.days()))]
    pub async fn fetch_window(
        &self,
        query: &NewsQuery,
        window: DateWindow,
        today: NaiveDate,
    ) -> Result<PageResult, UpstreamError> {
        let from = window.from_date(today);
        info!(url = %self.loggable_url(query, from), "Fetching");
        let url = self.request_url(query, from);

        let response = self.http.get(url).send().await?;
        let status = response.status();

        match status {
            StatusCode::TOO_MANY_REQUESTS => Err(UpstreamError::RateLimited),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!(%status, "Auth error from NewsAPI");
                Err(UpstreamError::Unauthorized)
            }
            s if !s.is_success() => {
                error!(status = s.as_u16(), "NewsAPI error");
                Err(UpstreamError::Status {
                    status: s,
                    reason: s.canonical_reason().unwrap_or("Unknown").to_string(),
                })
            }
            _ => Ok(response.json::<PageResult>().await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(server: &Server) -> UpstreamClient {
        let endpoint = Url::parse(&format!("{}/v2/everything", server.url())).unwrap();
        UpstreamClient::new("test-key".to_string(), endpoint).unwrap()
    }

    fn query(search: Option<&str>, categories: Option<&str>) -> NewsQuery {
        NewsQuery::new(1, search.map(str::to_string), categories.map(str::to_string))
    }

    const ONE_ARTICLE: &str = r#"{"status":"ok","totalResults":1,"articles":[{
        "source":{"id":"reuters","name":"Reuters"},"author":null,"title":"Found",
        "description":"d","url":"https://reuters.com/a","urlToImage":null,
        "publishedAt":"2026-10-01T00:00:00Z","content":null}]}"#;

    #[test]
    fn test_search_takes_precedence() {
        assert_eq!(
            query(Some("flood"), Some("sports")).search_terms(),
            "Philippines flood"
        );
        assert_eq!(query(None, Some("sports")).search_terms(), "Philippines sports");
        assert_eq!(query(None, None).search_terms(), "Philippines");
    }

    #[test]
    fn test_blank_terms_count_as_absent() {
        assert_eq!(query(Some("  "), Some("tech")).search_terms(), "Philippines tech");
        assert_eq!(query(Some(""), Some("")).search_terms(), "Philippines");
    }

    #[test]
    fn test_date_window_from_date() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            DateWindow::Week.from_date(today),
            NaiveDate::from_ymd_opt(2026, 10, 9).unwrap()
        );
        assert_eq!(
            DateWindow::Month.from_date(today),
            NaiveDate::from_ymd_opt(2026, 9, 16).unwrap()
        );
    }

    #[test]
    fn test_request_url_parameters() {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).unwrap();
        let client = UpstreamClient::new("k".to_string(), endpoint).unwrap();
        let from = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        let url = client.request_url(&query(None, Some("sports")), from);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        let get = |k: &str| pairs.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(get("apiKey"), Some("k"));
        assert_eq!(get("pageSize"), Some("12"));
        assert_eq!(get("page"), Some("1"));
        assert_eq!(get("from"), Some("2026-10-09"));
        assert_eq!(get("sortBy"), Some("publishedAt"));
        assert_eq!(get("language"), Some("en"));
        assert_eq!(get("q"), Some("Philippines sports"));
    }

    #[test]
    fn test_loggable_url_hides_key_that_needs_encoding() {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).unwrap();
        let client = UpstreamClient::new("ab+c/d=".to_string(), endpoint).unwrap();
        let from = NaiveDate::from_ymd_opt(2026, 10, 9).unwrap();
        let q = query(Some("flood"), None);

        let sent = client.request_url(&q, from);
        assert!(sent.as_str().contains("ab%2Bc%2Fd%3D"));

        let logged = client.loggable_url(&q, from);
        let key = logged
            .query_pairs()
            .find(|(k, _)| k == "apiKey")
            .map(|(_, v)| v.into_owned());
        assert_eq!(key.as_deref(), Some(REDACTED));
        assert!(!logged.as_str().contains("ab%2B"));
        assert!(!logged.as_str().contains("ab+c"));

        let rest = |url: &Url| {
            url.query_pairs()
                .filter(|(k, _)| k != "apiKey")
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect::<Vec<_>>()
        };
        assert_eq!(rest(&sent), rest(&logged));
    }

    #[tokio::test]
    async fn test_fetch_returns_week_results() {
        let mut server = Server::new_async().await;
        let today = Utc::now().date_naive();
        let week_from = DateWindow::Week.from_date(today).format("%Y-%m-%d").to_string();
        let mock = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("from".into(), week_from),
                Matcher::UrlEncoded("q".into(), "Philippines flood".into()),
            ]))
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_body(ONE_ARTICLE)
            .expect(1)
            .create_async()
            .await;

        let page = client(&server).fetch(&query(Some("flood"), None)).await.unwrap();
        assert_eq!(page.articles.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_widens_to_month_when_week_empty() {
        let mut server = Server::new_async().await;
        let today = Utc::now().date_naive();
        let week_from = DateWindow::Week.from_date(today).format("%Y-%m-%d").to_string();
        let month_from = DateWindow::Month.from_date(today).format("%Y-%m-%d").to_string();

        let week = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::UrlEncoded("from".into(), week_from))
            .with_status(200)
            .with_body(r#"{"status":"ok","totalResults":0,"articles":[]}"#)
            .expect(1)
            .create_async()
            .await;
        let month = server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::UrlEncoded("from".into(), month_from))
            .with_status(200)
            .with_body(ONE_ARTICLE)
            .expect(1)
            .create_async()
            .await;

        let page = client(&server).fetch(&query(None, None)).await.unwrap();
        assert_eq!(page.articles[0].title, "Found");
        week.assert_async().await;
        month.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let err = client(&server).fetch(&query(None, None)).await.unwrap_err();
        assert!(matches!(err, UpstreamError::RateLimited));
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_unauthorized() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let err = client(&server).fetch(&query(None, None)).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Unauthorized));
    }

    #[tokio::test]
    async fn test_other_status_keeps_reason() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v2/everything")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = client(&server).fetch(&query(None, None)).await.unwrap_err();
        match err {
            UpstreamError::Status { status, reason } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
                assert_eq!(reason, "Service Unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
