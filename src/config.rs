//! Validated runtime configuration for the proxy.
//!
//! [`ServerConfig`] is built from the `serve` subcommand's arguments (which
//! already fold in environment variables and `.env`). The NewsAPI credential
//! is mandatory unless the deferred-check mode is requested, in which case
//! the server starts anyway and each news request answers with a 500.

use crate::cli::ServeArgs;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NEWSAPI_KEY not set (pass --api-key or set it in the environment or .env)")]
    MissingCredential,

    #[error("Invalid upstream URL {url}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` only when the credential check is deferred to request time.
    pub api_key: Option<String>,
    pub endpoint: Url,
}

impl ServerConfig {
    pub fn from_args(args: &ServeArgs) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .as_ref()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        match (&api_key, args.defer_credential_check) {
            (None, false) => return Err(ConfigError::MissingCredential),
            (None, true) => warn!("NEWSAPI_KEY not set; news requests will fail with 500"),
            (Some(_), _) => info!("NewsAPI credential loaded"),
        }

        let endpoint =
            Url::parse(&args.upstream_url).map_err(|source| ConfigError::InvalidEndpoint {
                url: args.upstream_url.clone(),
                source,
            })?;

        Ok(Self {
            host: args.host.clone(),
            port: args.port,
            api_key,
            endpoint,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
