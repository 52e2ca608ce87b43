//! Utility functions and helpers.

pub mod http;
pub mod timing;

use std::sync::LazyLock;

use regex::Regex;

/// A run of exactly four digits, bounded by non-digits or the string edges.
static YEAR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{4})(?:[^0-9]|$)").expect("valid regex"));

/// Extract the first four-digit year token from free text.
///
/// The token may sit inside other text (`"abs2000def"`), but longer digit runs
/// such as `"12345"` are not years.
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_TOKEN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
