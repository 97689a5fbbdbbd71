//! Scan engine: configuration, concurrent fetching and the scan loop.

mod fetch;
mod scan;
mod settings;

pub use fetch::FetchOrchestrator;
pub use scan::{CycleReport, Engine, RunSummary, ScanState, StopReason};
pub use settings::{
    EngineConfig, EngineConfigBuilder, DEFAULT_REFRESH_INTERVAL, DEFAULT_SOURCE_TIMEOUT,
};
