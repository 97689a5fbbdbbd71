//! Price extraction from free-form listing text.
//!
//! Marketplace pages rarely expose a machine-readable price. The helpers here
//! locate the first currency-prefixed number (`$19.99`, `£1,250`, `€ 40`) and
//! turn it into a [`Price`].

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

fn currency_token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"[$£€]\s?(\d[\d,]*(?:\.\d+)?)").expect("price pattern is valid")
    })
}

/// Return the first currency-prefixed token in `text`, including its symbol.
#[must_use]
pub fn find_price_token(text: &str) -> Option<&str> {
    currency_token().find(text).map(|m| m.as_str())
}

/// Extract the first currency-prefixed price from `text`.
///
/// Grouping separators are stripped before parsing. Returns `None` when the
/// text contains no such token.
#[must_use]
pub fn extract_price(text: &str) -> Option<Price> {
    let caps = currency_token().captures(text)?;
    parse_number(caps.get(1)?.as_str())
}

/// Parse a price that may be either a bare number (`"1,299.00"`) or text
/// containing a currency token (`"Now only $40!"`).
#[must_use]
pub fn parse_price_text(text: &str) -> Option<Price> {
    parse_number(text.trim()).or_else(|| extract_price(text))
}

fn parse_number(digits: &str) -> Option<Price> {
    let cleaned: String = digits.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}
