//! Where the reader gets its pages from.
//!
//! [`PageSource`] is the seam between the browsing session and the network.
//! The production implementation, [`ProxyClient`], calls the proxy's
//! `/api/news/all` endpoint; tests substitute an in-memory source.

use crate::models::{ErrorBody, PageResult};
use crate::utils::truncate_for_log;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

/// Errors a [`PageSource`] can report. The `Display` text is what the
/// reader shows inline.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The proxy answered with an `{ "error": ... }` body.
    #[error("{0}")]
    Api(String),

    /// The proxy answered with a non-success status and no usable body.
    #[error("Failed to fetch news: {0}")]
    Status(String),

    #[error("Failed to reach news proxy: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid proxy URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One page request as the session issues it.
///
/// At most one of `search` and `categories` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub search: Option<String>,
    pub categories: Option<String>,
}

/// Trait for fetching one page of filtered results.
pub trait PageSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, FetchError>;
}

/// [`PageSource`] backed by the proxy's HTTP surface.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    /// Base of the proxy API, e.g. `http://localhost:5178/api/`.
    base: Url,
}

impl ProxyClient {
    pub fn new(mut base: Url) -> Self {
        // `join` replaces the last segment unless the path ends in `/`
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub fn request_url(&self, request: &PageRequest) -> Result<Url, FetchError> {
        let mut url = self.base.join("news/all")?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &request.page.to_string());
            if let Some(search) = &request.search {
                pairs.append_pair("search", search);
            } else if let Some(categories) = &request.categories {
                pairs.append_pair("categories", categories);
            }
        }
        Ok(url)
    }
}

impl PageSource for ProxyClient {
    #[instrument(level = "debug", skip_all, fields(page = request.page))]
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult, FetchError> {
        let url = self.request_url(request)?;
        debug!(%url, "Fetching");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<PageResult>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(ErrorBody { error }) => Err(FetchError::Api(error)),
            Err(_) => {
                warn!(%status, body = %truncate_for_log(&body, 200), "Proxy returned non-JSON error");
                Err(FetchError::Status(
                    status.canonical_reason().unwrap_or("Unknown").to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn request(search: Option<&str>, categories: Option<&str>) -> PageRequest {
        PageRequest {
            page: 3,
            search: search.map(str::to_string),
            categories: categories.map(str::to_string),
        }
    }

    fn client(server: &Server) -> ProxyClient {
        ProxyClient::new(Url::parse(&format!("{}/api/", server.url())).unwrap())
    }

    #[test]
    fn test_base_without_trailing_slash_keeps_api_segment() {
        let client = ProxyClient::new(Url::parse("http://localhost:5178/api").unwrap());
        let url = client.request_url(&request(None, Some("tech"))).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5178/api/news/all?page=3&categories=tech"
        );

        let slashed = ProxyClient::new(Url::parse("http://localhost:5178/api/").unwrap());
        assert_eq!(slashed.request_url(&request(None, Some("tech"))).unwrap(), url);
    }

    #[test]
    fn test_request_url_prefers_search() {
        let client = ProxyClient::new(Url::parse("http://localhost:5178/api/").unwrap());
        let url = client
            .request_url(&request(Some("flood"), Some("sports")))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5178/api/news/all?page=3&search=flood");
    }

    #[test]
    fn test_request_url_with_category() {
        let client = ProxyClient::new(Url::parse("http://localhost:5178/api/").unwrap());
        let url = client.request_url(&request(None, Some("tech"))).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5178/api/news/all?page=3&categories=tech");
    }

    #[tokio::test]
    async fn test_fetch_page_success() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/news/all")
            .match_query(Matcher::UrlEncoded("categories".into(), "tech".into()))
            .with_status(200)
            .with_body(r#"{"status":"ok","totalResults":0,"articles":[]}"#)
            .create_async()
            .await;

        let page = client(&server)
            .fetch_page(&request(None, Some("tech")))
            .await
            .unwrap();
        assert_eq!(page.total_results, 0);
    }

    #[tokio::test]
    async fn test_fetch_page_surfaces_error_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/news/all")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":"Daily request limit reached. Please try again tomorrow."}"#)
            .create_async()
            .await;

        let err = client(&server)
            .fetch_page(&request(None, None))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Daily request limit reached. Please try again tomorrow."
        );
    }

    #[tokio::test]
    async fn test_fetch_page_falls_back_to_status_text() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/news/all")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client(&server)
            .fetch_page(&request(None, None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to fetch news: Bad Gateway");
    }
}
