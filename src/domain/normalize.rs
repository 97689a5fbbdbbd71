//! Conversion from a source's raw output into the canonical [`Listing`].

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use super::listing::{Listing, RawListing};
use super::price::{parse_price_text, Price};

/// Keys a source may use to carry its own market estimate, in priority order.
pub const ESTIMATE_KEYS: [&str; 5] = [
    "market_value",
    "predicted_value",
    "predicted_price",
    "estimated_price",
    "estimated_value",
];

/// Normalize a raw listing.
///
/// Missing or unparseable fields become `None`; nothing here fails. The
/// first estimate key (see [`ESTIMATE_KEYS`]) holding a usable number wins.
#[must_use]
pub fn normalize(raw: &RawListing) -> Listing {
    Listing {
        title: raw.get("title").and_then(text_field),
        price: raw.get("price").and_then(price_field),
        url: raw.get("url").and_then(text_field),
        predicted_value: ESTIMATE_KEYS
            .iter()
            .find_map(|key| raw.get(key).and_then(price_field)),
        source: None,
    }
}

/// Normalize a raw listing and tag it with the marketplace it came from.
#[must_use]
pub fn normalize_from(source: &str, raw: &RawListing) -> Listing {
    let mut listing = normalize(raw);
    listing.source = Some(source.to_string());
    listing
}

fn text_field(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn price_field(value: &Value) -> Option<Price> {
    match value {
        Value::Number(n) => {
            let repr = n.to_string();
            Decimal::from_str(&repr)
                .or_else(|_| Decimal::from_scientific(&repr))
                .ok()
        }
        Value::String(s) => parse_price_text(s),
        _ => None,
    }
}
