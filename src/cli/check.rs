//! Configuration validation command.

use std::path::Path;

use crate::cli::output;
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::error::Result;
use crate::source::{SourceRegistry, SourceSelection};

/// Validate the configuration without scanning.
pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let shown = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    output::section("Configuration Check");
    output::field("Config", shown.display());
    if config_path.is_none() && !shown.exists() {
        output::note("No config file found, checking built-in defaults");
    }

    let config = Config::load_or_default(config_path)?;
    let registry = SourceRegistry::builtin(&config.sources)?;
    let selection = SourceSelection::from_names(&config.scan.marketplaces);
    let active = registry.select(&selection)?;
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field(
        "Marketplaces",
        active.iter().map(|s| s.name()).collect::<Vec<_>>().join(", "),
    );
    output::field("Threshold", config.scan.deal_threshold);
    output::field("Interval", format!("{}s", config.scan.refresh_interval_secs));
    output::field("Timeout", format!("{}s", config.sources.timeout_secs));
    match config.scan.iterations {
        Some(n) => output::field("Iterations", n),
        None => output::field("Iterations", "until interrupted"),
    }
    if let Some(path) = &config.alerts.csv_file {
        output::field("CSV", path.display());
    }

    if config.engine_config().is_ok() {
        output::success("Search terms configured");
    } else {
        output::warning("No search terms configured (pass them to `flipscan run`)");
    }

    Ok(())
}
