// src/services/search.rs

//! Search orchestrator.
//!
//! Fans one probe per catalog entry out over the shared worker pool, waits
//! for every probe, and keeps the claimed results. Results arrive in
//! completion order; no ordering relative to the catalog is implied.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::{AppError, Result};
use crate::models::{Catalog, Config, ProbeResult, QueryStatus};
use crate::services::classifier::ResponseClassifier;
use crate::services::pool::WorkerPool;
use crate::services::probe::ProbeWorker;
use crate::services::request::RequestBuilder;
use crate::transport::{HttpTransport, Transport};

/// Every non-dropped result of one search, plus bookkeeping.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub username: String,
    /// Results in completion order
    pub results: Vec<ProbeResult>,
    /// Probes that produced no verdict
    pub dropped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SearchOutcome {
    pub fn count(&self, status: QueryStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }

    /// Keep only the sites where the username is claimed.
    pub fn into_claimed(self) -> Vec<ProbeResult> {
        self.results.into_iter().filter(|r| r.is_claimed()).collect()
    }
}

/// Username search over a fixed catalog.
///
/// All collaborators are passed in; nothing is global.
pub struct SearchService {
    catalog: Arc<Catalog>,
    worker: Arc<ProbeWorker>,
    pool: WorkerPool,
}

impl SearchService {
    pub fn new(catalog: Arc<Catalog>, worker: ProbeWorker, pool: WorkerPool) -> Self {
        Self {
            catalog,
            worker: Arc::new(worker),
            pool,
        }
    }

    /// Wire the service from configuration: reqwest transport and a pool of
    /// `min(max_workers, catalog size)` slots.
    pub fn from_config(config: &Config, catalog: Arc<Catalog>) -> Result<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.search)?);
        let pool = WorkerPool::new(config.search.pool_size(catalog.len()));
        Ok(Self::with_transport(config, catalog, transport, pool))
    }

    /// Wire the service from configuration around an existing transport and pool.
    pub fn with_transport(
        config: &Config,
        catalog: Arc<Catalog>,
        transport: Arc<dyn Transport>,
        pool: WorkerPool,
    ) -> Self {
        let worker = ProbeWorker::new(
            RequestBuilder::new(&config.search.user_agent),
            ResponseClassifier::new(config.waf.fingerprints.clone()),
            transport,
        );
        Self::new(catalog, worker, pool)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Sites where `username` is claimed. Returns once every probe has finished.
    pub async fn search_by_username(&self, username: &str) -> Result<Vec<ProbeResult>> {
        Ok(self.probe_all(username).await?.into_claimed())
    }

    /// Blocking form of [`search_by_username`](Self::search_by_username).
    ///
    /// Drives the search on a private runtime; must not be called from async code.
    pub fn search_blocking(&self, username: &str) -> Result<Vec<ProbeResult>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.search_by_username(username))
    }

    /// Probe every site and collect every result, whatever its status.
    pub async fn probe_all(&self, username: &str) -> Result<SearchOutcome> {
        if self.pool.is_closed() {
            return Err(AppError::PoolClosed);
        }

        let started_at = Utc::now();
        let username: Arc<str> = Arc::from(username);
        log::info!(
            "Searching {} sites for '{}' ({} workers)",
            self.catalog.len(),
            username,
            self.pool.size()
        );

        let mut pending: FuturesUnordered<_> = (0..self.catalog.len())
            .map(|index| {
                let catalog = Arc::clone(&self.catalog);
                let worker = Arc::clone(&self.worker);
                let pool = self.pool.clone();
                let username = Arc::clone(&username);

                tokio::spawn(async move {
                    let profile = &catalog.sites()[index];
                    let Ok(_permit) = pool.acquire().await else {
                        log::debug!("{}: skipped, worker pool shut down", profile.name);
                        return None;
                    };
                    worker.probe(&username, profile).await
                })
            })
            .collect();

        let mut results = Vec::new();
        let mut dropped = 0;
        while let Some(joined) = pending.next().await {
            match joined {
                Ok(Some(result)) => results.push(result),
                Ok(None) => dropped += 1,
                Err(e) => {
                    log::error!("Probe task failed: {e}");
                    dropped += 1;
                }
            }
        }

        let outcome = SearchOutcome {
            username: username.to_string(),
            results,
            dropped,
            started_at,
            finished_at: Utc::now(),
        };
        log::info!(
            "Search for '{}' finished in {:.1}s: {} claimed, {} available, {} unknown, {} illegal, {} dropped",
            outcome.username,
            outcome.elapsed_secs(),
            outcome.count(QueryStatus::Claimed),
            outcome.count(QueryStatus::Available),
            outcome.count(QueryStatus::Unknown),
            outcome.count(QueryStatus::Illegal),
            outcome.dropped
        );
        Ok(outcome)
    }

    /// Shut the worker pool down; later searches fail with [`AppError::PoolClosed`].
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}
