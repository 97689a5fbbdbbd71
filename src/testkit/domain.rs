//! Builders for raw listings used across tests.

use crate::domain::RawListing;

/// Raw listing with a title, numeric price and URL.
pub fn raw(title: &str, price: u32, url: &str) -> RawListing {
    RawListing::new()
        .with("title", title)
        .with("price", price)
        .with("url", url)
}

/// Raw listing that also carries an explicit market estimate.
pub fn raw_with_estimate(title: &str, price: u32, estimate: u32, url: &str) -> RawListing {
    raw(title, price, url).with("market_value", estimate)
}
