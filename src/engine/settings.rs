//! Immutable engine configuration.

use std::time::Duration;

use rust_decimal::Decimal;

use crate::domain::DealThreshold;
use crate::error::ConfigError;
use crate::source::SourceSelection;

/// Default deadline for a single source query.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default pause between scan cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Validated settings for one [`Engine`](super::Engine).
///
/// Built through [`EngineConfig::builder`]; fixed for the engine's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    search_terms: Vec<String>,
    refresh_interval: Duration,
    deal_threshold: DealThreshold,
    active_sources: SourceSelection,
    source_timeout: Duration,
}

impl EngineConfig {
    /// Start building a configuration for the given search terms.
    #[must_use]
    pub fn builder(search_terms: Vec<String>) -> EngineConfigBuilder {
        EngineConfigBuilder::new(search_terms)
    }

    #[must_use]
    pub fn search_terms(&self) -> &[String] {
        &self.search_terms
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    #[must_use]
    pub fn deal_threshold(&self) -> DealThreshold {
        self.deal_threshold
    }

    #[must_use]
    pub fn active_sources(&self) -> &SourceSelection {
        &self.active_sources
    }

    #[must_use]
    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }
}

/// Builder for [`EngineConfig`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    search_terms: Vec<String>,
    refresh_interval: Duration,
    deal_threshold: Decimal,
    active_sources: SourceSelection,
    source_timeout: Duration,
}

impl EngineConfigBuilder {
    fn new(search_terms: Vec<String>) -> Self {
        Self {
            search_terms,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            deal_threshold: DealThreshold::DEFAULT.value(),
            active_sources: SourceSelection::All,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    #[must_use]
    pub fn deal_threshold(mut self, threshold: Decimal) -> Self {
        self.deal_threshold = threshold;
        self
    }

    #[must_use]
    pub fn active_sources(mut self, selection: SourceSelection) -> Self {
        self.active_sources = selection;
        self
    }

    #[must_use]
    pub fn source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// Search terms are trimmed and blanks dropped; at least one must remain.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let search_terms: Vec<String> = self
            .search_terms
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if search_terms.is_empty() {
            return Err(ConfigError::MissingField {
                field: "search_terms",
            });
        }
        if self.source_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }

        Ok(EngineConfig {
            search_terms,
            refresh_interval: self.refresh_interval,
            deal_threshold: DealThreshold::try_new(self.deal_threshold)?,
            active_sources: self.active_sources,
            source_timeout: self.source_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults() {
        let config = EngineConfig::builder(vec!["phone".into()]).build().unwrap();

        assert_eq!(config.search_terms(), ["phone".to_string()]);
        assert_eq!(config.refresh_interval(), Duration::from_secs(60));
        assert_eq!(config.deal_threshold().value(), dec!(0.5));
        assert_eq!(config.active_sources(), &SourceSelection::All);
        assert_eq!(config.source_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn empty_search_terms_rejected() {
        assert!(matches!(
            EngineConfig::builder(vec![]).build(),
            Err(ConfigError::MissingField {
                field: "search_terms"
            })
        ));
        assert!(EngineConfig::builder(vec!["  ".into()]).build().is_err());
    }

    #[test]
    fn threshold_validated_at_build() {
        for bad in [dec!(0), dec!(-1), dec!(1.0001)] {
            assert!(matches!(
                EngineConfig::builder(vec!["x".into()])
                    .deal_threshold(bad)
                    .build(),
                Err(ConfigError::InvalidValue {
                    field: "deal_threshold",
                    ..
                })
            ));
        }
    }

    #[test]
    fn zero_timeout_rejected() {
        assert!(EngineConfig::builder(vec!["x".into()])
            .source_timeout(Duration::ZERO)
            .build()
            .is_err());
    }

    #[test]
    fn terms_are_trimmed() {
        let config = EngineConfig::builder(vec![" lamp ".into(), "".into()])
            .build()
            .unwrap();
        assert_eq!(config.search_terms(), ["lamp".to_string()]);
    }
}
