//! Scripted sources for exercising the fetch pipeline without a network.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::RawListing;
use crate::error::SourceError;
use crate::source::Source;

/// Returns the same listings on every query.
pub struct StaticSource {
    name: String,
    listings: Vec<RawListing>,
    queries: Arc<AtomicU32>,
}

impl StaticSource {
    pub fn new(name: &str, listings: Vec<RawListing>) -> Self {
        Self {
            name: name.to_string(),
            listings,
            queries: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Shared counter of how many times the source was queried.
    pub fn query_count(&self) -> Arc<AtomicU32> {
        self.queries.clone()
    }
}

#[async_trait]
impl Source for StaticSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, _terms: &[String]) -> Result<Vec<RawListing>, SourceError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.listings.clone())
    }
}

/// Pops one batch per query; returns nothing once the script runs out.
pub struct ScriptedSource {
    name: String,
    batches: Mutex<VecDeque<Vec<RawListing>>>,
}

impl ScriptedSource {
    pub fn new(name: &str, batches: Vec<Vec<RawListing>>) -> Self {
        Self {
            name: name.to_string(),
            batches: Mutex::new(batches.into()),
        }
    }
}

#[async_trait]
impl Source for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, _terms: &[String]) -> Result<Vec<RawListing>, SourceError> {
        Ok(self.batches.lock().pop_front().unwrap_or_default())
    }
}

/// Always fails as if the marketplace answered with HTTP 503.
pub struct FailingSource {
    name: String,
}

impl FailingSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Source for FailingSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, _terms: &[String]) -> Result<Vec<RawListing>, SourceError> {
        Err(SourceError::Status { status: 503 })
    }
}

/// Waits `delay` before answering.
pub struct SlowSource {
    name: String,
    delay: Duration,
    listings: Vec<RawListing>,
}

impl SlowSource {
    pub fn new(name: &str, delay: Duration, listings: Vec<RawListing>) -> Self {
        Self {
            name: name.to_string(),
            delay,
            listings,
        }
    }
}

#[async_trait]
impl Source for SlowSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, _terms: &[String]) -> Result<Vec<RawListing>, SourceError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.listings.clone())
    }
}

/// Panics inside the query task.
pub struct PanickingSource {
    name: String,
}

impl PanickingSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Source for PanickingSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query(&self, _terms: &[String]) -> Result<Vec<RawListing>, SourceError> {
        panic!("{} blew up", self.name)
    }
}
