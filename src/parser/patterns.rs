use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\s().-]{7,}\d").unwrap());
pub(crate) static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// All `local@domain` tokens in `text`, in order. No dedup, no TLD check.
pub fn extract_emails(text: &str) -> Vec<String> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Anything that looks like a phone number. Long digit runs match too.
pub fn extract_phone_numbers(text: &str) -> Vec<String> {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Hrefs of anchors whose lowercased text contains any of `keywords`.
pub fn find_links(document: &Html, keywords: &[&str]) -> Vec<String> {
    document
        .select(&ANCHOR_SEL)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let text = a.text().collect::<String>().to_lowercase();
            keywords
                .iter()
                .any(|kw| text.contains(kw))
                .then(|| href.to_string())
        })
        .collect()
}
