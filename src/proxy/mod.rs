//! HTTP proxy in front of NewsAPI.
//!
//! The proxy keeps the NewsAPI credential server-side and narrows results to
//! Philippine outlets before they reach a client.
//!
//! # Submodules
//!
//! - [`upstream`]: NewsAPI client with the 7-day/30-day window retry
//! - [`filter`]: Source allow-list applied to every page
//! - [`routes`]: axum handlers for `/api/news/all` and `/api/health`
//! - [`error`]: Mapping of failures onto HTTP status codes and `{ "error" }` bodies
//! - [`server`]: Router assembly, CORS and graceful shutdown
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET` | `/api/news/all?page=&search=&categories=` | `{ articles, totalResults, status }` |
//! | `GET` | `/api/health` | `{ "status": "ok" }` |
//! | `OPTIONS` | any | empty 200 (CORS preflight) |

pub mod error;
pub mod filter;
pub mod routes;
pub mod server;
pub mod state;
pub mod upstream;
