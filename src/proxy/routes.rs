use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::models::PageResult;

use super::{
    error::ProxyError, filter::retain_allowed_sources, state::AppState, upstream::NewsQuery,
};

/// Raw query string of `GET /api/news/all`.
#[derive(Debug, Default, Deserialize)]
pub struct NewsParams {
    pub page: Option<String>,
    pub search: Option<String>,
    pub categories: Option<String>,
}

impl NewsParams {
    pub fn into_query(self) -> Result<NewsQuery, ProxyError> {
        let page = match self.page.as_deref().map(str::trim) {
            None | Some("") => 1,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| ProxyError::InvalidPage(raw.to_string()))?,
        };

        Ok(NewsQuery::new(page, self.search, self.categories))
    }
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

#[instrument(level = "info", skip_all)]
pub async fn news_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<NewsParams>, QueryRejection>,
) -> Result<Json<PageResult>, ProxyError> {
    let upstream = state
        .upstream
        .as_ref()
        .ok_or(ProxyError::MissingCredential)?;

    let Query(params) = params.map_err(|e| ProxyError::InvalidQuery(e.body_text()))?;
    let query = params.into_query()?;
    let page = upstream.fetch(&query).await?;

    Ok(Json(retain_allowed_sources(page)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<&str>) -> NewsParams {
        NewsParams {
            page: page.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_page_defaults_to_one() {
        assert_eq!(params(None).into_query().unwrap().page, 1);
        assert_eq!(params(Some("")).into_query().unwrap().page, 1);
    }

    #[test]
    fn test_page_parses() {
        assert_eq!(params(Some("4")).into_query().unwrap().page, 4);
    }

    #[test]
    fn test_invalid_pages_rejected() {
        assert!(matches!(
            params(Some("zero")).into_query(),
            Err(ProxyError::InvalidPage(_))
        ));
        assert!(matches!(
            params(Some("0")).into_query(),
            Err(ProxyError::InvalidPage(_))
        ));
        assert!(matches!(
            params(Some("-2")).into_query(),
            Err(ProxyError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_filters_carry_into_query() {
        let query = NewsParams {
            page: Some("2".to_string()),
            search: Some("typhoon".to_string()),
            categories: Some("sports".to_string()),
        }
        .into_query()
        .unwrap();
        assert_eq!(query.search.as_deref(), Some("typhoon"));
        assert_eq!(query.search_terms(), "Philippines typhoon");
    }
}
