//! Concurrent fan-out over the active sources.
//!
//! Every source is queried in its own task under its own deadline. A source
//! that errors, panics or misses the deadline contributes nothing to the
//! cycle; its siblings are unaffected. The merged, normalized listings are
//! then filtered through the shared [`DedupStore`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::domain::{normalize_from, DedupStore, Listing};
use crate::error::SourceError;
use crate::source::Source;

pub struct FetchOrchestrator {
    sources: Vec<Arc<dyn Source>>,
    timeout: Duration,
    dedup: Arc<DedupStore>,
}

impl FetchOrchestrator {
    #[must_use]
    pub fn new(sources: Vec<Arc<dyn Source>>, timeout: Duration, dedup: Arc<DedupStore>) -> Self {
        Self {
            sources,
            timeout,
            dedup,
        }
    }

    /// Names of the sources this orchestrator queries.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn dedup(&self) -> &Arc<DedupStore> {
        &self.dedup
    }

    pub(crate) fn set_dedup(&mut self, dedup: Arc<DedupStore>) {
        self.dedup = dedup;
    }

    /// Query every source and merge the normalized results.
    ///
    /// No deduplication is applied; order across sources is unspecified.
    pub async fn gather(&self, terms: &[String]) -> Vec<Listing> {
        let mut tasks = self.spawn(terms);
        collect(&mut tasks).await
    }

    /// Query every source and keep only listings not seen in earlier calls.
    pub async fn fetch(&self, terms: &[String]) -> Vec<Listing> {
        let merged = self.gather(terms).await;
        self.dedup.retain_new(merged)
    }

    /// Like [`fetch`](Self::fetch), but gives up as soon as `shutdown` flips
    /// to `true`.
    ///
    /// Returns `None` when cancelled; outstanding queries are aborted and the
    /// dedup store is left untouched.
    pub async fn fetch_until(
        &self,
        terms: &[String],
        shutdown: &mut watch::Receiver<bool>,
    ) -> Option<Vec<Listing>> {
        let mut tasks = self.spawn(terms);
        let merged = tokio::select! {
            biased;
            () = cancelled(shutdown) => None,
            merged = collect(&mut tasks) => Some(merged),
        };

        match merged {
            Some(merged) => Some(self.dedup.retain_new(merged)),
            None => {
                debug!(outstanding = tasks.len(), "Fetch abandoned on shutdown");
                tasks.abort_all();
                None
            }
        }
    }

    fn spawn(&self, terms: &[String]) -> JoinSet<Vec<Listing>> {
        let terms: Arc<[String]> = terms.into();
        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let source = Arc::clone(source);
            let terms = Arc::clone(&terms);
            let timeout = self.timeout;
            tasks.spawn(async move { query_source(source.as_ref(), &terms, timeout).await });
        }
        tasks
    }
}

async fn collect(tasks: &mut JoinSet<Vec<Listing>>) -> Vec<Listing> {
    let mut merged = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(listings) => merged.extend(listings),
            Err(e) => warn!(error = %e, "Source task failed, skipping for this cycle"),
        }
    }
    merged
}

/// Query one source under a deadline. Any failure becomes an empty result.
async fn query_source(source: &dyn Source, terms: &[String], timeout: Duration) -> Vec<Listing> {
    let started = Instant::now();
    let result = match tokio::time::timeout(timeout, source.query(terms)).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout { after: timeout }),
    };

    match result {
        Ok(raw) => {
            let listings: Vec<Listing> = raw
                .iter()
                .map(|r| normalize_from(source.name(), r))
                .collect();
            debug!(
                source = source.name(),
                listings = listings.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Source answered"
            );
            listings
        }
        Err(e) => {
            warn!(source = source.name(), error = %e, "Source failed, skipping for this cycle");
            Vec::new()
        }
    }
}

/// Resolve once `shutdown` reads `true`.
///
/// Never resolves if the sender is dropped without signalling.
pub(crate) async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
