//! Listing types: the raw shape a marketplace hands back and the canonical
//! shape the rest of the pipeline works with.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::price::Price;

/// A listing exactly as a source produced it.
///
/// Sources are heterogeneous: some return numbers, some strings, some omit
/// fields entirely. The raw form keeps whatever keys the source emitted and
/// leaves interpretation to [`normalize`](super::normalize).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawListing(Map<String, Value>);

impl RawListing {
    /// Create an empty raw listing.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Set a field, returning the updated listing.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Set a field in place.
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Look up a field. JSON `null` is reported as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawListing {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One normalized item offer.
///
/// Every field is explicitly optional. Absence is a valid state and is never
/// coerced to a default; serialization keeps absent fields as `null` so the
/// canonical keys are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: Option<String>,
    pub price: Option<Price>,
    pub url: Option<String>,
    /// Explicit market estimate carried by the source, if any.
    pub predicted_value: Option<Price>,
    /// Marketplace the listing came from.
    pub source: Option<String>,
}

impl Listing {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_predicted_value(mut self, value: Price) -> Self {
        self.predicted_value = Some(value);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Identity used for deduplication.
    ///
    /// Listings without a (non-blank) URL have no identity and are treated as
    /// new every time they are seen.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title.as_deref().unwrap_or("<untitled>"))?;
        if let Some(price) = self.price {
            write!(f, " @ ${price}")?;
        }
        if let Some(source) = &self.source {
            write!(f, " [{source}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn identity_is_trimmed_url() {
        let listing = Listing::new().with_url("  https://example.com/item/1 ");
        assert_eq!(listing.identity(), Some("https://example.com/item/1"));
    }

    #[test]
    fn blank_url_has_no_identity() {
        assert_eq!(Listing::new().identity(), None);
        assert_eq!(Listing::new().with_url("   ").identity(), None);
    }

    #[test]
    fn serialization_keeps_absent_fields() {
        let listing = Listing::new().with_title("phone");
        let value = serde_json::to_value(&listing).unwrap();

        assert_eq!(value["title"], json!("phone"));
        assert!(value.get("price").is_some_and(Value::is_null));
        assert!(value.get("url").is_some_and(Value::is_null));
        assert!(value.get("predicted_value").is_some_and(Value::is_null));
    }

    #[test]
    fn raw_listing_treats_null_as_absent() {
        let raw = RawListing::new().with("price", Value::Null).with("title", "x");
        assert!(raw.get("price").is_none());
        assert_eq!(raw.get("title"), Some(&json!("x")));
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn display_includes_price_and_source() {
        let listing = Listing::new()
            .with_title("Old Phone")
            .with_price(dec!(50))
            .with_source("facebook");
        assert_eq!(listing.to_string(), "Old Phone @ $50 [facebook]");
    }
}
