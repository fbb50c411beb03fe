use std::sync::Arc;

use crate::config::ServerConfig;

use super::upstream::{UpstreamClient, UpstreamError};

pub struct AppState {
    /// Absent when the server was started without a credential.
    pub upstream: Option<UpstreamClient>,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Arc<Self>, UpstreamError> {
        let upstream = config
            .api_key
            .clone()
            .map(|key| UpstreamClient::new(key, config.endpoint.clone()))
            .transpose()?;

        Ok(Arc::new(Self { upstream }))
    }
}
