//! Marketplace source abstraction.
//!
//! A [`Source`] wraps one marketplace and answers search queries with raw
//! listings. Sources are registered by name in a [`SourceRegistry`] and the
//! active subset is picked once, at engine construction, via a
//! [`SourceSelection`].

mod marketplace;
pub mod markup;
mod registry;

pub use marketplace::{MarketplaceSource, MARKETPLACES};
pub use registry::{SourceRegistry, SourceSelection};

use async_trait::async_trait;

use crate::domain::RawListing;
use crate::error::SourceError;

/// Query capability for a single marketplace.
///
/// Implementations own request construction and response parsing. They are
/// read-only: they must not touch shared pipeline state, and any failure is
/// reported as a [`SourceError`] which the caller turns into an empty result.
#[async_trait]
pub trait Source: Send + Sync {
    /// Stable name used for selection and logging.
    fn name(&self) -> &str;

    /// Search the marketplace for `terms`.
    async fn query(&self, terms: &[String]) -> Result<Vec<RawListing>, SourceError>;
}
