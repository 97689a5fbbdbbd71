use std::time::Duration;

use thiserror::Error;

/// Configuration-related errors with structured variants.
///
/// All of these are fatal at construction time: no scan cycle runs while the
/// configuration is invalid.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown marketplace '{name}' (available: {available})")]
    UnknownSource { name: String, available: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures raised while querying a single marketplace.
///
/// These never escape a scan cycle; the orchestrator logs them and treats the
/// source as having returned nothing.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response status {status}")]
    Status { status: u16 },

    #[error("no response within {after:?}")]
    Timeout { after: Duration },

    #[error("failed to parse response: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
