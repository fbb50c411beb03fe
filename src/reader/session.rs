//! Browsing state for the single-article reader.
//!
//! A [`BrowsingSession`] shows one article at a time. It tracks a cursor
//! `(page, index)` over the pages served by a [`PageSource`], resolves pages
//! through its own [`PageCache`], and speculatively loads the neighbouring
//! page when the reader is likely to cross a page boundary next:
//!
//! - at index 1 of a page with a successor, the next page is prefetched
//! - at index 0 of any page after the first, the previous page is prefetched
//!
//! Changing the active query (search term or category) drops the cache and
//! the prefetch bookkeeping and starts over at page 1.
//!
//! Every operation takes `&mut self`, so a fetch always finishes before the
//! cursor can move again and a late response can never overwrite a newer
//! view.

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::models::{Article, PageResult};

use super::cache::{ActiveQuery, CacheKey, PageCache};
use super::source::{FetchError, PageRequest, PageSource};

/// Categories offered by the reader.
pub const CATEGORIES: [&str; 8] = [
    "politics",
    "business",
    "tech",
    "sports",
    "entertainment",
    "health",
    "science",
    "general",
];

pub const DEFAULT_CATEGORY: &str = "sports";

/// Divisor applied to the match count to decide how many pages are navigable.
pub const DEFAULT_VIEW_LIMIT: u32 = 3;

/// Where a loaded page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    Cache,
    Network,
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved within the current page.
    Moved,
    /// A different page was loaded and the cursor placed on its first article.
    Loaded(PageOrigin),
    /// Nothing to move to in that direction.
    AtBoundary,
    /// The effective query did not change.
    Unchanged,
}

pub struct BrowsingSession<S> {
    source: S,
    search: String,
    category: String,
    cache: PageCache,
    prefetched: HashSet<u32>,
    current_page: u32,
    current_index: usize,
    articles: Vec<Article>,
    total_matches: u32,
    error: Option<String>,
    view_limit: u32,
}

impl<S: PageSource> BrowsingSession<S> {
    pub fn new(source: S, category: impl Into<String>) -> Self {
        Self {
            source,
            search: String::new(),
            category: category.into(),
            cache: PageCache::new(),
            prefetched: HashSet::new(),
            current_page: 1,
            current_index: 0,
            articles: Vec::new(),
            total_matches: 0,
            error: None,
            view_limit: DEFAULT_VIEW_LIMIT,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_view_limit(mut self, view_limit: u32) -> Self {
        self.view_limit = view_limit.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn active_query(&self) -> ActiveQuery {
        ActiveQuery::resolve(&self.search, &self.category)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn current_article(&self) -> Option<&Article> {
        self.articles.get(self.current_index)
    }

    pub fn total_matches(&self) -> u32 {
        self.total_matches
    }

    /// Message from the last failed page load, cleared by the next load.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn is_prefetched(&self, page: u32) -> bool {
        self.prefetched.contains(&page)
    }

    pub fn total_pages(&self) -> u32 {
        self.total_matches.div_ceil(self.view_limit)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// 1-based position of the current article across all pages.
    pub fn article_number(&self) -> u32 {
        let index = u32::try_from(self.current_index).unwrap_or(u32::MAX);
        self.current_page
            .saturating_sub(1)
            .saturating_mul(self.view_limit)
            .saturating_add(index)
            .saturating_add(1)
    }

    /// Up to three page numbers to offer around the current page.
    pub fn pagination_pages(&self) -> Vec<u32> {
        let total = self.total_pages();
        let current = self.current_page;

        if total <= 3 {
            (1..=total).collect()
        } else if current <= 2 {
            vec![1, 2, 3]
        } else if current >= total - 1 {
            vec![total - 2, total - 1, total]
        } else {
            vec![current - 1, current, current + 1]
        }
    }

    pub fn can_go_previous(&self) -> bool {
        !(self.current_page == 1 && self.current_index == 0)
    }

    pub fn can_go_next(&self) -> bool {
        self.current_index + 1 < self.articles.len() || self.has_next_page()
    }

    fn request(&self, page: u32) -> PageRequest {
        match self.active_query() {
            ActiveQuery::Search(search) => PageRequest {
                page,
                search: Some(search),
                categories: None,
            },
            ActiveQuery::Category(category) => PageRequest {
                page,
                search: None,
                categories: Some(category),
            },
        }
    }

    fn key(&self, page: u32) -> CacheKey {
        CacheKey::new(&self.active_query(), page)
    }

    async fn resolve(&mut self, page: u32) -> Result<(PageResult, PageOrigin), FetchError> {
        let key = self.key(page);
        if let Some(cached) = self.cache.get(&key) {
            debug!(%key, "Cache hit");
            return Ok((cached.clone(), PageOrigin::Cache));
        }

        let result = self.source.fetch_page(&self.request(page)).await?;
        self.cache.set(key, result.clone());
        Ok((result, PageOrigin::Network))
    }

    /// Load the first page for the current query.
    pub async fn start(&mut self) -> Result<PageOrigin, FetchError> {
        self.reset_query().await
    }

    /// Show `page`, placing the cursor on its first article.
    ///
    /// On failure the article list is emptied and the error message kept for
    /// display; the page number is left where it was.
    #[instrument(level = "debug", skip(self))]
    pub async fn load_page(&mut self, page: u32) -> Result<PageOrigin, FetchError> {
        let page = page.max(1);
        self.error = None;

        match self.resolve(page).await {
            Ok((result, origin)) => {
                self.articles = result.articles;
                self.total_matches = result.total_results;
                self.current_page = page;
                self.current_index = 0;
                debug!(page, ?origin, articles = self.articles.len(), "Page loaded");

                self.prefetch_adjacent().await;
                Ok(origin)
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to load page");
                self.error = Some(e.to_string());
                self.articles.clear();
                self.current_index = 0;
                Err(e)
            }
        }
    }

    /// Warm the cache with `page` without touching the cursor.
    ///
    /// Returns `false` when the page was already cached or prefetched.
    #[instrument(level = "debug", skip(self))]
    pub async fn prefetch(&mut self, page: u32) -> Result<bool, FetchError> {
        let key = self.key(page);
        if self.cache.contains(&key) || self.prefetched.contains(&page) {
            return Ok(false);
        }

        let result = self.source.fetch_page(&self.request(page)).await?;
        self.cache.set(key, result);
        self.prefetched.insert(page);
        debug!(page, "Prefetched");
        Ok(true)
    }

    async fn prefetch_adjacent(&mut self) {
        let target = match self.current_index {
            1 if self.has_next_page() => Some(self.current_page + 1),
            0 if self.current_page > 1 => Some(self.current_page - 1),
            _ => None,
        };

        if let Some(page) = target {
            if let Err(e) = self.prefetch(page).await {
                warn!(page, error = %e, "Prefetch error");
            }
        }
    }

    pub async fn next_article(&mut self) -> Result<Navigation, FetchError> {
        if self.current_index + 1 < self.articles.len() {
            self.current_index += 1;
            self.prefetch_adjacent().await;
            Ok(Navigation::Moved)
        } else if self.has_next_page() {
            let origin = self.load_page(self.current_page + 1).await?;
            Ok(Navigation::Loaded(origin))
        } else {
            Ok(Navigation::AtBoundary)
        }
    }

    /// Step back one article. Crossing into the previous page lands on its
    /// first article, not its last.
    pub async fn prev_article(&mut self) -> Result<Navigation, FetchError> {
        if self.current_index > 0 {
            self.current_index -= 1;
            self.prefetch_adjacent().await;
            Ok(Navigation::Moved)
        } else if self.current_page > 1 {
            let origin = self.load_page(self.current_page - 1).await?;
            Ok(Navigation::Loaded(origin))
        } else {
            Ok(Navigation::AtBoundary)
        }
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<Navigation, FetchError> {
        if page == 0 {
            return Ok(Navigation::AtBoundary);
        }
        let origin = self.load_page(page).await?;
        Ok(Navigation::Loaded(origin))
    }

    /// Switch to searching for `term`. A blank term falls back to the category.
    pub async fn set_search(&mut self, term: impl Into<String>) -> Result<Navigation, FetchError> {
        let before = self.active_query();
        self.search = term.into();
        self.requery(before).await
    }

    /// Browse `category`. Picking a category clears any search term.
    pub async fn set_category(
        &mut self,
        category: impl Into<String>,
    ) -> Result<Navigation, FetchError> {
        let before = self.active_query();
        self.category = category.into();
        self.search.clear();
        self.requery(before).await
    }

    async fn requery(&mut self, before: ActiveQuery) -> Result<Navigation, FetchError> {
        let after = self.active_query();
        if after == before {
            return Ok(Navigation::Unchanged);
        }

        info!(query = ?after, "Query changed");
        let origin = self.reset_query().await?;
        Ok(Navigation::Loaded(origin))
    }

    async fn reset_query(&mut self) -> Result<PageOrigin, FetchError> {
        self.cache.clear();
        self.prefetched.clear();
        self.current_page = 1;
        self.current_index = 0;
        self.load_page(1).await
    }
}
