//! Handler for the `run` command.

use std::path::Path;

use chrono::Local;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::cli::{output, RunArgs};
use crate::config::Config;
use crate::engine::{Engine, StopReason};
use crate::error::Result;
use crate::notifier::{CsvSink, LogSink, SinkRegistry};
use crate::source::SourceRegistry;

/// Execute the run command.
pub async fn execute(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    let mut config = Config::load_or_default(config_path)?;
    config.apply(args.into_overrides());
    config.validate()?;
    let engine_config = config.engine_config()?;

    config.init_logging();

    let registry = SourceRegistry::builtin(&config.sources)?;
    let sinks = build_sinks(&config)?;
    let mut engine = Engine::new(engine_config, &registry, sinks)?;

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Terms", engine.config().search_terms().join(", "));
    output::field("Threshold", engine.config().deal_threshold());
    output::field("Started", Local::now().format("%Y-%m-%d %H:%M:%S"));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
        }
    });

    let summary = engine.run(config.scan.iterations, shutdown_rx).await;

    output::section("Summary");
    output::field("Cycles", summary.cycles);
    output::field("Listings", summary.listings);
    output::field("Deals", output::highlight(summary.deals));
    match summary.stop_reason {
        StopReason::IterationsReached => output::success("Scan complete"),
        StopReason::Cancelled => output::warning("Scan interrupted"),
    }

    Ok(())
}

fn build_sinks(config: &Config) -> Result<SinkRegistry> {
    let mut sinks = SinkRegistry::new();
    if config.alerts.log {
        sinks.register(Box::new(LogSink));
    }
    if let Some(path) = &config.alerts.csv_file {
        let sink = CsvSink::open(path)?;
        info!(path = %sink.path().display(), "Writing deals to CSV");
        sinks.register(Box::new(sink));
    }
    Ok(sinks)
}
