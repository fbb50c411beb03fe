//! Single-article news reader backed by the proxy.
//!
//! # Submodules
//!
//! - [`source`]: [`PageSource`](source::PageSource) trait and the HTTP [`ProxyClient`](source::ProxyClient)
//! - [`cache`]: Session-local page cache and its composite key
//! - [`session`]: Cursor, navigation and adjacent-page prefetch
//! - [`favorites`]: Saved articles behind a key-value slot
//! - [`terminal`]: Interactive line-based front end
//!
//! # Flow
//!
//! ```text
//! command ─▶ BrowsingSession ─▶ PageCache ─(miss)─▶ ProxyClient ─▶ /api/news/all
//!                  │
//!                  └─▶ render ◀── FavoritesStore ◀── FileStore
//! ```

pub mod cache;
pub mod favorites;
pub mod session;
pub mod source;
pub mod terminal;
