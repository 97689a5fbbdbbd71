//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;
pub mod sources;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

use crate::config::ConfigOverrides;

/// Flipscan - scan online marketplaces for underpriced listings.
#[derive(Parser, Debug)]
#[command(name = "flipscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults to ./flipscan.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan marketplaces and alert on deals
    Run(RunArgs),

    /// List the built-in marketplaces
    Sources,

    /// Validate the configuration file
    Check,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Search terms (override `scan.search_terms`)
    pub terms: Vec<String>,

    /// Marketplaces to query, comma-separated or repeated ("all" for every one)
    #[arg(short, long, value_delimiter = ',')]
    pub marketplaces: Vec<String>,

    /// Seconds between scan cycles (0 = no pause)
    #[arg(short = 'r', long)]
    pub refresh_interval: Option<u64>,

    /// Deal threshold: alert when price < predicted value * threshold
    #[arg(short, long)]
    pub threshold: Option<Decimal>,

    /// Stop after this many cycles
    #[arg(short = 'n', long)]
    pub iterations: Option<u64>,

    /// Append each deal to this CSV file
    #[arg(short, long)]
    pub output_csv: Option<PathBuf>,

    /// Per-marketplace request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,
}

impl RunArgs {
    /// Convert the flags into config overrides.
    #[must_use]
    pub fn into_overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            search_terms: self.terms,
            marketplaces: self.marketplaces,
            refresh_interval_secs: self.refresh_interval,
            deal_threshold: self.threshold,
            iterations: self.iterations,
            csv_file: self.output_csv,
            timeout_secs: self.timeout,
            log_level: self.log_level,
            json_logs: self.json_logs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("flipscan").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn run_flags_map_to_overrides() {
        let cli = parse(&[
            "run",
            "iphone",
            "switch lite",
            "--threshold",
            "0.7",
            "--refresh-interval",
            "0",
            "--iterations",
            "2",
            "--output-csv",
            "deals.csv",
            "--json-logs",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        let overrides = args.into_overrides();

        assert_eq!(overrides.search_terms, vec!["iphone", "switch lite"]);
        assert_eq!(overrides.deal_threshold, Some(dec!(0.7)));
        assert_eq!(overrides.refresh_interval_secs, Some(0));
        assert_eq!(overrides.iterations, Some(2));
        assert_eq!(overrides.csv_file, Some(PathBuf::from("deals.csv")));
        assert!(overrides.json_logs);
    }

    #[test]
    fn marketplaces_accept_commas_and_repeats() {
        let cli = parse(&["run", "x", "-m", "ebay,mercari", "--marketplaces", "craigslist"]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.marketplaces, vec!["ebay", "mercari", "craigslist"]);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = parse(&["check", "--config", "alt.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn threshold_must_be_a_number() {
        assert!(Cli::try_parse_from(["flipscan", "run", "x", "--threshold", "cheap"]).is_err());
    }
}
