//! Listing extraction from marketplace search-result markup.
//!
//! Search pages are scanned for anchors that wrap a `class="title"` element.
//! Each such anchor yields one [`RawListing`] with `title`, `price` (the raw
//! currency token, if any) and `url` (the `href` resolved against the page).

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::domain::{find_price_token, RawListing};

fn anchor_pattern() -> &'static Regex {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    ANCHOR.get_or_init(|| {
        Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a\s*>"#)
            .expect("anchor pattern is valid")
    })
}

fn title_pattern() -> &'static Regex {
    static TITLE: OnceLock<Regex> = OnceLock::new();
    TITLE.get_or_init(|| {
        Regex::new(r#"(?is)<[a-z][a-z0-9]*\b[^>]*?\bclass\s*=\s*["'](?:[^"']*\s)?title(?:\s[^"']*)?["'][^>]*>(.*?)</"#)
            .expect("title pattern is valid")
    })
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"))
}

/// Parse every listing anchor in `html`.
///
/// Anchors without a title element (navigation, pagination) are skipped.
/// Relative links are resolved against `base`.
#[must_use]
pub fn parse_listings(html: &str, base: &Url) -> Vec<RawListing> {
    anchor_pattern()
        .captures_iter(html)
        .filter_map(|caps| {
            let href = caps.get(1)?.as_str();
            let body = caps.get(2)?.as_str();
            let title = title_pattern()
                .captures(body)
                .and_then(|t| t.get(1))
                .map(|t| to_text(t.as_str()))
                .filter(|t| !t.is_empty())?;

            let mut raw = RawListing::new().with("title", title);
            let text = to_text(body);
            if let Some(token) = find_price_token(&text) {
                raw.insert("price", token);
            }
            if let Some(url) = resolve(base, href) {
                raw.insert("url", url);
            }
            Some(raw)
        })
        .collect()
}

fn resolve(base: &Url, href: &str) -> Option<String> {
    let href = decode_entities(href.trim());
    if href.is_empty() {
        return None;
    }
    base.join(&href).ok().map(String::from)
}

/// Strip tags, decode the common entities and collapse whitespace.
fn to_text(fragment: &str) -> String {
    let stripped = tag_pattern().replace_all(fragment, " ");
    decode_entities(&stripped)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
