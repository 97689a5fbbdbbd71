//! HTTP-backed marketplace source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use super::markup::parse_listings;
use super::Source;
use crate::domain::RawListing;
use crate::error::{ConfigError, SourceError};

/// Placeholder replaced with the URL-encoded search terms.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Built-in marketplaces as `(name, search URL template)`.
pub const MARKETPLACES: [(&str, &str); 5] = [
    (
        "facebook",
        "https://www.facebook.com/marketplace/search/?query={query}",
    ),
    ("ebay", "https://www.ebay.com/sch/i.html?_nkw={query}"),
    (
        "craigslist",
        "https://www.craigslist.org/search/sss?query={query}",
    ),
    (
        "aliexpress",
        "https://www.aliexpress.com/wholesale?SearchText={query}",
    ),
    ("mercari", "https://www.mercari.com/search/?keyword={query}"),
];

/// A marketplace queried by fetching its search page and scanning the markup.
#[derive(Debug, Clone)]
pub struct MarketplaceSource {
    name: String,
    search_url: String,
    http: HttpClient,
}

impl MarketplaceSource {
    /// Create a source from a search URL template containing `{query}`.
    pub fn new(
        name: impl Into<String>,
        search_url: impl Into<String>,
        http: HttpClient,
    ) -> Result<Self, ConfigError> {
        let search_url = search_url.into();
        if !search_url.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigError::InvalidValue {
                field: "sources.urls",
                reason: format!("'{search_url}' has no {QUERY_PLACEHOLDER} placeholder"),
            });
        }
        Url::parse(&search_url.replace(QUERY_PLACEHOLDER, "")).map_err(|e| {
            ConfigError::InvalidValue {
                field: "sources.urls",
                reason: format!("'{search_url}': {e}"),
            }
        })?;

        Ok(Self {
            name: name.into(),
            search_url,
            http,
        })
    }

    /// Build an HTTP client with the given per-request timeout and user agent.
    #[must_use]
    pub fn http_client(timeout: Duration, user_agent: &str) -> HttpClient {
        HttpClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            })
    }

    /// Search URL for the given terms.
    pub fn search_url(&self, terms: &[String]) -> Result<Url, SourceError> {
        let query = terms.join(" ");
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let url = self.search_url.replace(QUERY_PLACEHOLDER, &encoded);
        Url::parse(&url).map_err(|e| SourceError::Parse(format!("search url '{url}': {e}")))
    }
}

#[async_trait]
impl Source for MarketplaceSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, terms: &[String]) -> Result<Vec<RawListing>, SourceError> {
        let url = self.search_url(terms)?;
        debug!(source = %self.name, url = %url, "Querying marketplace");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let listings = parse_listings(&body, &url);
        debug!(source = %self.name, listings = listings.len(), "Parsed search page");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(template: &str) -> Result<MarketplaceSource, ConfigError> {
        MarketplaceSource::new("test", template, HttpClient::new())
    }

    #[test]
    fn builtin_templates_are_valid() {
        for (name, template) in MARKETPLACES {
            assert!(
                MarketplaceSource::new(name, template, HttpClient::new()).is_ok(),
                "{name}"
            );
        }
    }

    #[test]
    fn search_terms_are_encoded() {
        let source = source("https://www.ebay.com/sch/i.html?_nkw={query}").unwrap();
        let url = source
            .search_url(&["iphone 12".to_string(), "pro&max".to_string()])
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://www.ebay.com/sch/i.html?_nkw=iphone+12+pro%26max"
        );
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        assert!(matches!(
            source("https://www.ebay.com/sch/i.html"),
            Err(ConfigError::InvalidValue {
                field: "sources.urls",
                ..
            })
        ));
    }

    #[test]
    fn malformed_template_is_rejected() {
        assert!(source("not a url {query}").is_err());
    }

    #[tokio::test]
    async fn unreachable_host_is_a_source_error() {
        let source = MarketplaceSource::new(
            "local",
            "http://127.0.0.1:9/search?q={query}",
            MarketplaceSource::http_client(Duration::from_millis(500), "flipscan-test"),
        )
        .unwrap();

        let result = source.query(&["lamp".to_string()]).await;

        assert!(matches!(result, Err(SourceError::Http(_))));
    }
}
