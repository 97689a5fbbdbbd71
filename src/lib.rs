//! Flipscan - scan online marketplaces for underpriced listings.
//!
//! Each scan cycle queries every active marketplace concurrently, normalizes
//! the heterogeneous results into [`Listing`](domain::Listing)s, drops
//! listings already surfaced in earlier cycles, and alerts on the ones priced
//! well below their predicted value.
//!
//! # Modules
//!
//! - [`domain`] - Listings, price extraction, dedup store, valuation
//! - [`source`] - Marketplace adapters and the source registry
//! - [`engine`] - Concurrent fetch orchestration and the scan loop
//! - [`notifier`] - Alert sinks (log, CSV)
//! - [`config`] - TOML configuration and command-line overrides
//! - [`cli`] - Command handlers for the `flipscan` binary
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use flipscan::engine::{Engine, EngineConfig};
//! use flipscan::notifier::SinkRegistry;
//! use flipscan::source::SourceRegistry;
//! use flipscan::config::SourcesConfig;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::builder(vec!["nintendo switch".into()]).build()?;
//! let registry = SourceRegistry::builtin(&SourcesConfig::default())?;
//! let mut engine = Engine::new(config, &registry, SinkRegistry::new())?;
//!
//! let (_stop, shutdown) = tokio::sync::watch::channel(false);
//! let summary = engine.run(Some(1), shutdown).await;
//! println!("{} deals", summary.deals);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod notifier;
pub mod source;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
