//! Resale valuation and deal classification.
//!
//! A [`Predictor`] assigns each listing an estimated resale value. The
//! [`DealEvaluator`] flags a listing as a deal when its asking price is
//! strictly below `threshold × predicted value`.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::listing::Listing;
use super::price::Price;
use crate::error::ConfigError;

/// Markup applied by [`FallbackPredictor`] when a listing has no estimate.
pub const DEFAULT_MARKUP: Decimal = dec!(1.5);

/// Capability that estimates a listing's resale value.
///
/// Returning `None` excludes the listing from deal evaluation.
pub trait Predictor: Send + Sync {
    fn predict(&self, listing: &Listing) -> Option<Price>;
}

/// Uses the listing's own estimate when present, else `price × markup`.
#[derive(Debug, Clone, Copy)]
pub struct FallbackPredictor {
    markup: Decimal,
}

impl FallbackPredictor {
    #[must_use]
    pub const fn new(markup: Decimal) -> Self {
        Self { markup }
    }
}

impl Default for FallbackPredictor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKUP)
    }
}

impl Predictor for FallbackPredictor {
    fn predict(&self, listing: &Listing) -> Option<Price> {
        listing
            .predicted_value
            .or_else(|| listing.price?.checked_mul(self.markup))
    }
}

/// Fraction of the predicted value below which a price counts as a deal.
///
/// Always within `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DealThreshold(Decimal);

impl DealThreshold {
    pub const DEFAULT: Self = Self(dec!(0.5));

    /// Validate and wrap a threshold.
    pub fn try_new(value: Decimal) -> Result<Self, ConfigError> {
        if value <= Decimal::ZERO || value > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "deal_threshold",
                reason: format!("must be in (0, 1], got {value}"),
            });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl Default for DealThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DealThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A listing flagged as underpriced, with the value it was judged against.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub listing: Listing,
    pub predicted_value: Price,
}

/// Classifies listings as deals.
///
/// Evaluation has no side effects, so one evaluator can be shared freely.
#[derive(Clone)]
pub struct DealEvaluator {
    threshold: DealThreshold,
    predictor: Arc<dyn Predictor>,
}

impl DealEvaluator {
    #[must_use]
    pub fn new(threshold: DealThreshold) -> Self {
        Self::with_predictor(threshold, Arc::new(FallbackPredictor::default()))
    }

    #[must_use]
    pub fn with_predictor(threshold: DealThreshold, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            threshold,
            predictor,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> DealThreshold {
        self.threshold
    }

    /// Predicted value for a listing, if it qualifies as a deal.
    ///
    /// A listing with no price or no prediction never qualifies. The
    /// comparison is strict: a price exactly at the boundary is not a deal.
    #[must_use]
    pub fn assess(&self, listing: &Listing) -> Option<Price> {
        let price = listing.price?;
        let predicted = self.predictor.predict(listing)?;
        let ceiling = predicted.checked_mul(self.threshold.value())?;
        (price < ceiling).then_some(predicted)
    }

    /// Lazily yield the deals among `listings`.
    ///
    /// The returned iterator consumes its input; evaluate a fresh batch each
    /// cycle.
    pub fn evaluate<'a, I>(&'a self, listings: I) -> impl Iterator<Item = Deal> + 'a
    where
        I: IntoIterator<Item = Listing>,
        I::IntoIter: 'a,
    {
        listings.into_iter().filter_map(move |listing| {
            self.assess(&listing).map(|predicted_value| Deal {
                listing,
                predicted_value,
            })
        })
    }
}

impl fmt::Debug for DealEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DealEvaluator")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}
