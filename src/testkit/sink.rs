//! Alert sink that records every notification.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Listing, Price};
use crate::notifier::AlertSink;

/// Keeps `(listing, predicted value)` pairs in arrival order.
///
/// Clones share the same buffer, so a test can hand one clone to the engine
/// and inspect another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    alerts: Arc<Mutex<Vec<(Listing, Price)>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<(Listing, Price)> {
        self.alerts.lock().clone()
    }

    /// Titles of alerted listings, sorted for order-independent assertions.
    pub fn titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .alerts
            .lock()
            .iter()
            .filter_map(|(listing, _)| listing.title.clone())
            .collect();
        titles.sort();
        titles
    }

    pub fn len(&self) -> usize {
        self.alerts.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.lock().is_empty()
    }
}

impl AlertSink for RecordingSink {
    fn notify(&self, listing: &Listing, predicted_value: Price) {
        self.alerts.lock().push((listing.clone(), predicted_value));
    }
}
