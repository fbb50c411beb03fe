//! # Philippines News Reader
//!
//! A small proxy in front of [NewsAPI](https://newsapi.org) that narrows
//! results to Philippine and major wire outlets, plus a terminal reader that
//! browses those results one article at a time.
//!
//! ## Features
//!
//! - Keeps the NewsAPI key server-side and redacts it from logs
//! - Widens the search window from 7 to 30 days when the last week is empty
//! - Filters every page to an allow-list of outlets and rewrites `totalResults`
//! - Reader caches pages per query and prefetches the neighbouring page
//! - Favorites persist between reader sessions
//!
//! ## Usage
//!
//! ```sh
//! NEWSAPI_KEY=... ph_news_reader serve --port 5178
//! ph_news_reader read --category politics
//! ```
//!
//! ## Architecture
//!
//! 1. **Upstream**: one NewsAPI request per page, retried once over a wider window
//! 2. **Proxy**: allow-list filter, JSON + CORS surface, status mapping
//! 3. **Reader**: cursor, page cache and prefetch over the proxy
//! 4. **Favorites**: JSON list in a single key-value slot

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};
use url::Url;

mod cli;
mod config;
mod models;
mod proxy;
mod reader;
mod utils;

use cli::{Cli, Command, ReadArgs};
use config::ServerConfig;
use reader::{
    favorites::{FavoritesStore, FileStore},
    session::BrowsingSession,
    source::ProxyClient,
    terminal,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // .env is optional
    dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    match args.command {
        Command::Serve(serve) => {
            let config = ServerConfig::from_args(&serve).inspect_err(|e| {
                error!(error = %e, "Refusing to start proxy");
            })?;
            debug!(host = %config.host, port = config.port, endpoint = %config.endpoint, "Parsed server configuration");
            info!(version = env!("CARGO_PKG_VERSION"), "news proxy starting up");
            proxy::server::start_server(config).await
        }
        Command::Read(read) => run_reader(read).await,
    }
}

#[instrument(level = "info", skip_all, fields(proxy = %args.proxy_url))]
async fn run_reader(args: ReadArgs) -> Result<(), Box<dyn Error>> {
    let base = Url::parse(&args.proxy_url)?;
    let mut favorites = FavoritesStore::new(FileStore::open(&args.data_dir)?);

    let mut session = BrowsingSession::new(ProxyClient::new(base), args.category);
    if let Some(search) = args.search {
        session = session.with_search(search);
    }

    terminal::run(&mut session, &mut favorites).await?;
    info!("Reader closed");
    Ok(())
}
