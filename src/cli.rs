//! Command-line interface definitions for the news reader.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every option can also come from an environment variable; a `.env` file in
//! the working directory is loaded before parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::proxy::upstream::DEFAULT_ENDPOINT;
use crate::reader::session::DEFAULT_CATEGORY;

/// Command-line arguments for the Philippines news proxy and reader.
///
/// # Examples
///
/// ```sh
/// # Run the proxy on the default port
/// NEWSAPI_KEY=... ph_news_reader serve
///
/// # Browse tech headlines through a running proxy
/// ph_news_reader read --category tech
///
/// # Start the reader on a search
/// ph_news_reader read --search "typhoon relief"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP proxy in front of NewsAPI
    Serve(ServeArgs),
    /// Browse headlines one article at a time in the terminal
    Read(ReadArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5178)]
    pub port: u16,

    /// NewsAPI key
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// NewsAPI search endpoint
    #[arg(long, env = "NEWSAPI_URL", default_value = DEFAULT_ENDPOINT)]
    pub upstream_url: String,

    /// Start without a key and answer each news request with a 500 instead
    #[arg(long)]
    pub defer_credential_check: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Base URL of the proxy API
    #[arg(long, env = "NEWS_PROXY_URL", default_value = "http://localhost:5178/api/")]
    pub proxy_url: String,

    /// Category to start on
    #[arg(short, long, default_value = DEFAULT_CATEGORY)]
    pub category: String,

    /// Search term to start on (overrides the category)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Directory holding saved favorites
    #[arg(long, env = "NEWS_READER_DATA", default_value = ".news_reader")]
    pub data_dir: PathBuf,
}
