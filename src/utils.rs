//! Utility functions for log hygiene and display formatting.
//!
//! This module provides helper functions used throughout the application:
//! - The placeholder substituted for the credential in logged URLs
//! - String truncation for logging upstream bodies
//! - Display helpers for category labels and publish dates

use chrono::DateTime;

/// Placeholder written in place of the API key in logged URLs.
pub const REDACTED: &str = "[REDACTED]";

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes (on a char boundary)
/// with an ellipsis and byte count indicator appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if shorter than `max`, otherwise a truncated version
/// with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Capitalize the first character of a string.
///
/// Used for category labels (e.g., "sports" -> "Sports").
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Render an RFC 3339 publish timestamp as a short date, e.g. `Oct 15, 2026`.
///
/// Unparseable input is returned as-is.
pub fn format_published_date(published_at: &str) -> String {
    DateTime::parse_from_rfc3339(published_at)
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| published_at.to_string())
}
