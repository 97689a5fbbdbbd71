//! Application configuration loading and validation.
//!
//! Configuration comes from an optional TOML file; command-line values are
//! layered on top with [`Config::apply`] and always win.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::DealThreshold;
use crate::engine::EngineConfig;
use crate::error::{ConfigError, Result};
use crate::source::SourceSelection;

/// Default configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "flipscan.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scan: ScanConfig,
    pub sources: SourcesConfig,
    pub alerts: AlertsConfig,
    pub logging: LoggingConfig,
}

/// What to search for and how often.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub search_terms: Vec<String>,
    /// Seconds to wait between cycles; 0 starts the next cycle immediately.
    pub refresh_interval_secs: u64,
    /// Fraction of the predicted value below which a listing is a deal.
    pub deal_threshold: Decimal,
    /// Marketplace names, or `["all"]`.
    pub marketplaces: Vec<String>,
    /// Number of cycles to run; unset runs until interrupted.
    pub iterations: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            search_terms: Vec::new(),
            refresh_interval_secs: 60,
            deal_threshold: DealThreshold::DEFAULT.value(),
            marketplaces: vec!["all".to_string()],
            iterations: None,
        }
    }
}

/// Marketplace request settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Deadline for a single marketplace query.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Search URL template overrides keyed by marketplace name.
    pub urls: BTreeMap<String, String>,
}

impl SourcesConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: concat!("flipscan/", env!("CARGO_PKG_VERSION")).to_string(),
            urls: BTreeMap::new(),
        }
    }
}

/// Where deal alerts go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Log each deal via tracing.
    pub log: bool,
    /// Append each deal to this CSV file.
    pub csv_file: Option<PathBuf>,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            log: true,
            csv_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

/// Values supplied on the command line. `None`/empty means "keep the file value".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub search_terms: Vec<String>,
    pub marketplaces: Vec<String>,
    pub refresh_interval_secs: Option<u64>,
    pub deal_threshold: Option<Decimal>,
    pub iterations: Option<u64>,
    pub csv_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&content)
    }

    /// Load `path` if given, else the default file if it exists, else defaults.
    ///
    /// A path passed explicitly must exist.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::load(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    #[allow(clippy::result_large_err)]
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer command-line values over the file values.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if !overrides.search_terms.is_empty() {
            self.scan.search_terms = overrides.search_terms;
        }
        if !overrides.marketplaces.is_empty() {
            self.scan.marketplaces = overrides.marketplaces;
        }
        if let Some(secs) = overrides.refresh_interval_secs {
            self.scan.refresh_interval_secs = secs;
        }
        if let Some(threshold) = overrides.deal_threshold {
            self.scan.deal_threshold = threshold;
        }
        if let Some(iterations) = overrides.iterations {
            self.scan.iterations = Some(iterations);
        }
        if let Some(path) = overrides.csv_file {
            self.alerts.csv_file = Some(path);
        }
        if let Some(secs) = overrides.timeout_secs {
            self.sources.timeout_secs = secs;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.json_logs {
            self.logging.format = "json".into();
        }
    }

    /// Check everything that can be checked without search terms.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        DealThreshold::try_new(self.scan.deal_threshold)?;
        if self.sources.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be at least 1 second".into(),
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected 'pretty' or 'json', got '{}'", self.logging.format),
            }
            .into());
        }
        Ok(())
    }

    /// Build the immutable engine configuration.
    ///
    /// Fails when no search terms were supplied or the threshold is out of
    /// range.
    pub fn engine_config(&self) -> std::result::Result<EngineConfig, ConfigError> {
        EngineConfig::builder(self.scan.search_terms.clone())
            .refresh_interval(Duration::from_secs(self.scan.refresh_interval_secs))
            .deal_threshold(self.scan.deal_threshold)
            .active_sources(SourceSelection::from_names(&self.scan.marketplaces))
            .source_timeout(self.sources.timeout())
            .build()
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert!(config.scan.search_terms.is_empty());
        assert_eq!(config.scan.refresh_interval_secs, 60);
        assert_eq!(config.scan.deal_threshold, dec!(0.5));
        assert_eq!(config.scan.marketplaces, vec!["all"]);
        assert_eq!(config.sources.timeout_secs, 5);
        assert!(config.alerts.log);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parses_all_sections() {
        let config = Config::parse(
            r#"
[scan]
search_terms = ["iphone 12", "switch"]
refresh_interval_secs = 30
deal_threshold = 0.7
marketplaces = ["ebay", "mercari"]
iterations = 3

[sources]
timeout_secs = 2
user_agent = "test-agent"

[sources.urls]
ebay = "http://localhost:8080/s?q={query}"

[alerts]
log = false
csv_file = "deals.csv"

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.scan.search_terms, vec!["iphone 12", "switch"]);
        assert_eq!(config.scan.deal_threshold, dec!(0.7));
        assert_eq!(config.scan.iterations, Some(3));
        assert_eq!(config.sources.timeout(), Duration::from_secs(2));
        assert_eq!(config.sources.urls["ebay"], "http://localhost:8080/s?q={query}");
        assert!(!config.alerts.log);
        assert_eq!(config.alerts.csv_file, Some(PathBuf::from("deals.csv")));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let result = Config::parse("[scan]\ndeal_threshold = 1.5\n");
        assert!(matches!(
            result,
            Err(crate::error::Error::Config(ConfigError::InvalidValue {
                field: "deal_threshold",
                ..
            }))
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Config::parse("[sources]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(Config::parse("[logging]\nformat = \"xml\"\n").is_err());
    }

    #[test]
    fn overrides_take_precedence() {
        let mut config = Config::parse(
            "[scan]\nsearch_terms = [\"lamp\"]\nmarketplaces = [\"ebay\"]\nrefresh_interval_secs = 90\n",
        )
        .unwrap();

        config.apply(ConfigOverrides {
            search_terms: vec!["desk".into()],
            marketplaces: vec!["craigslist".into(), "facebook".into()],
            refresh_interval_secs: Some(0),
            deal_threshold: Some(dec!(0.8)),
            csv_file: Some(PathBuf::from("out.csv")),
            json_logs: true,
            ..Default::default()
        });

        assert_eq!(config.scan.search_terms, vec!["desk"]);
        assert_eq!(config.scan.marketplaces, vec!["craigslist", "facebook"]);
        assert_eq!(config.scan.refresh_interval_secs, 0);
        assert_eq!(config.scan.deal_threshold, dec!(0.8));
        assert_eq!(config.alerts.csv_file, Some(PathBuf::from("out.csv")));
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn empty_overrides_keep_file_values() {
        let mut config = Config::parse("[scan]\nsearch_terms = [\"lamp\"]\n").unwrap();
        config.apply(ConfigOverrides::default());

        assert_eq!(config.scan.search_terms, vec!["lamp"]);
        assert_eq!(config.scan.marketplaces, vec!["all"]);
    }

    #[test]
    fn engine_config_requires_search_terms() {
        let config = Config::default();
        assert!(matches!(
            config.engine_config(),
            Err(ConfigError::MissingField {
                field: "search_terms"
            })
        ));
    }

    #[test]
    fn engine_config_carries_scan_settings() {
        let mut config = Config::default();
        config.scan.search_terms = vec!["bike".into()];
        config.scan.marketplaces = vec!["ebay".into()];
        config.scan.refresh_interval_secs = 0;

        let engine = config.engine_config().unwrap();

        assert_eq!(engine.search_terms(), ["bike".to_string()]);
        assert_eq!(engine.refresh_interval(), Duration::ZERO);
        assert_eq!(
            engine.active_sources(),
            &SourceSelection::Named(vec!["ebay".into()])
        );
        assert_eq!(engine.source_timeout(), Duration::from_secs(5));
    }
}
