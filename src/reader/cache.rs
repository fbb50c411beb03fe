//! Session-local page cache.
//!
//! Maps `(active query, page)` to the page result that query produced. There
//! is no eviction and no TTL; the owning session clears the whole map
//! whenever the active query changes.

use std::collections::HashMap;
use std::fmt;

use crate::models::PageResult;

/// The filter a session is browsing by.
///
/// Search and category are kept distinct so a search term that equals a
/// category name maps to a different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActiveQuery {
    Search(String),
    Category(String),
}

impl ActiveQuery {
    /// A non-blank search wins over the category.
    pub fn resolve(search: &str, category: &str) -> Self {
        if search.trim().is_empty() {
            ActiveQuery::Category(category.to_string())
        } else {
            ActiveQuery::Search(search.to_string())
        }
    }

    pub fn term(&self) -> &str {
        match self {
            ActiveQuery::Search(term) | ActiveQuery::Category(term) => term,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: ActiveQuery,
    pub page: u32,
}

impl CacheKey {
    pub fn new(query: &ActiveQuery, page: u32) -> Self {
        Self {
            query: query.clone(),
            page,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_page{}", self.query.term(), self.page)
    }
}

#[derive(Debug, Default)]
pub struct PageCache {
    entries: HashMap<CacheKey, PageResult>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&PageResult> {
        self.entries.get(key)
    }

    /// Store unconditionally, replacing any previous entry.
    pub fn set(&mut self, key: CacheKey, page: PageResult) {
        self.entries.insert(key, page);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
