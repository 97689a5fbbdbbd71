//! Cross-cycle suppression of listings that have already been surfaced.

use std::collections::HashSet;

use parking_lot::RwLock;

use super::listing::Listing;

/// Set of listing identities (URLs) surfaced so far.
///
/// Grows monotonically until [`prune`](Self::prune) clears it. There is no
/// expiry: an identity, once recorded, is suppressed until the next prune.
/// The store is shared behind an `Arc`, so all operations take `&self`.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: RwLock<HashSet<String>>,
}

impl DedupStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identity. Returns `true` if it had not been seen before.
    pub fn record(&self, identity: &str) -> bool {
        self.seen.write().insert(identity.to_string())
    }

    #[must_use]
    pub fn has_seen(&self, identity: &str) -> bool {
        self.seen.read().contains(identity)
    }

    /// Forget every recorded identity.
    pub fn prune(&self) {
        self.seen.write().clear();
    }

    /// Keep only listings not seen before, recording the new ones.
    ///
    /// Listings without an identity or without a price always pass and are
    /// never recorded, so a listing whose price failed to parse can still
    /// surface once a later cycle prices it. Duplicates within `listings`
    /// itself collapse to the first occurrence. The whole batch is filtered
    /// under a single write lock so a concurrent prune lands either before or
    /// after it.
    pub fn retain_new(&self, listings: Vec<Listing>) -> Vec<Listing> {
        let mut seen = self.seen.write();
        listings
            .into_iter()
            .filter(|listing| match (listing.identity(), listing.price) {
                (Some(identity), Some(_)) => seen.insert(identity.to_string()),
                _ => true,
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.read().is_empty()
    }
}
