//! Alert delivery for detected deals.
//!
//! The [`AlertSink`] trait is the delivery capability. Multiple sinks can be
//! registered with a [`SinkRegistry`]; every deal goes to all of them.

mod csv;

pub use csv::CsvSink;

use tracing::info;

use crate::domain::{Deal, Listing, Price};

/// Receiver of deal alerts.
///
/// Notifications are fire-and-forget: sinks handle their own failures and
/// never report back to the scan loop.
pub trait AlertSink: Send + Sync {
    fn notify(&self, listing: &Listing, predicted_value: Price);
}

/// Fan-out point for deal alerts: every deal reaches every sink, in
/// registration order.
pub struct SinkRegistry {
    sinks: Vec<Box<dyn AlertSink>>,
}

impl SinkRegistry {
    /// A registry with no sinks; [`Engine`](crate::engine::Engine) falls back
    /// to [`LogSink`] when handed one.
    #[must_use]
    pub fn new() -> Self {
        Self { sinks: vec![] }
    }

    /// Add a sink after the existing ones.
    pub fn register(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    /// Hand `deal` to each sink. A failing sink does not stop the others.
    pub fn notify_all(&self, deal: &Deal) {
        for sink in &self.sinks {
            sink.notify(&deal.listing, deal.predicted_value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// `true` when no sink would receive a deal.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Discards every deal.
pub struct NullSink;

impl AlertSink for NullSink {
    fn notify(&self, _listing: &Listing, _predicted_value: Price) {}
}

/// Writes one human-readable log line per deal.
pub struct LogSink;

impl AlertSink for LogSink {
    fn notify(&self, listing: &Listing, predicted_value: Price) {
        info!(
            title = listing.title.as_deref().unwrap_or("<untitled>"),
            price = ?listing.price,
            predicted = %predicted_value,
            source = listing.source.as_deref().unwrap_or("-"),
            url = listing.url.as_deref().unwrap_or("-"),
            "Deal found: {listing} (est. value ${predicted_value})"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::sink::RecordingSink;
    use rust_decimal_macros::dec;

    fn deal(title: &str) -> Deal {
        Deal {
            listing: Listing::new().with_title(title).with_price(dec!(1)),
            predicted_value: dec!(10),
        }
    }

    #[test]
    fn every_sink_receives_each_deal() {
        let (first, second) = (RecordingSink::new(), RecordingSink::new());
        let mut registry = SinkRegistry::new();
        registry.register(Box::new(first.clone()));
        registry.register(Box::new(second.clone()));

        registry.notify_all(&deal("lamp"));
        registry.notify_all(&deal("desk"));

        for sink in [first, second] {
            assert_eq!(sink.titles(), vec!["desk", "lamp"]);
            assert!(sink.alerts().iter().all(|(_, value)| *value == dec!(10)));
        }
    }

    #[test]
    fn null_and_log_sinks_accept_deals() {
        NullSink.notify(&deal("x").listing, dec!(10));
        LogSink.notify(&Listing::new(), dec!(10));
    }

    #[test]
    fn empty_until_a_sink_is_added() {
        let mut registry = SinkRegistry::default();
        assert!(registry.is_empty());

        registry.register(Box::new(NullSink));
        assert_eq!(registry.len(), 1);
    }
}
