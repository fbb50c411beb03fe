use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("NEWSAPI_KEY not configured on server")]
    MissingCredential,

    #[error("Invalid page parameter: {0}")]
    InvalidPage(String),

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::InvalidPage(_) | ProxyError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(UpstreamError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ProxyError::Upstream(UpstreamError::Unauthorized) => StatusCode::UNAUTHORIZED,
            ProxyError::Upstream(UpstreamError::Status { status, .. }) => *status,
            ProxyError::Upstream(UpstreamError::Transport(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();

        // transport and decode details stay in the log
        let message = match &self {
            ProxyError::Upstream(UpstreamError::Transport(e)) => {
                error!(error = %e, "Proxy error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
