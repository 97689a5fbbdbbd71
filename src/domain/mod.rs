//! Marketplace-agnostic domain logic.

mod dedup;
mod listing;
mod normalize;
mod price;
mod valuation;

pub use dedup::DedupStore;
pub use listing::{Listing, RawListing};
pub use normalize::{normalize, normalize_from, ESTIMATE_KEYS};
pub use price::{extract_price, find_price_token, parse_price_text, Price};
pub use valuation::{
    Deal, DealEvaluator, DealThreshold, FallbackPredictor, Predictor, DEFAULT_MARKUP,
};
