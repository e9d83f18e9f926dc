//! Concurrent comparison of two keyed collections.
//!
//! The coordinator walks collection A once. Keys missing from B are
//! removals; matched pairs that need comparing go onto a job channel with
//! room for a single pair, which blocks the coordinator until a worker is
//! free. Workers compute changelogs and send outcomes to one aggregator
//! task. Dropping the job sender ends the workers; once they have all
//! finished, the result channel closes and the aggregator returns.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use super::DiffError;
use super::changelog::{Changelog, changelog};
use super::collection::{Diffable, KeyedCollection};
use crate::planner::PlannerConfig;

/// An item present in both collections whose contents differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modification<T> {
    /// The item as it appears in collection A
    pub origin: T,
    pub changes: Changelog,
}

/// A matched pair whose changelog could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffFailure {
    pub key: String,
    pub error: String,
}

/// Outcome of comparing collection A against collection B.
///
/// All lists are sorted by item key.
#[derive(Debug, Clone, Serialize)]
pub struct DiffResult<T> {
    /// Items only in B
    pub additions: Vec<T>,
    /// Items only in A
    pub removals: Vec<T>,
    pub modifications: Vec<Modification<T>>,
    pub failures: Vec<DiffFailure>,
}

impl<T> DiffResult<T> {
    /// Returns true if nothing was added, removed, modified or failed.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
            && self.removals.is_empty()
            && self.modifications.is_empty()
            && self.failures.is_empty()
    }
}

enum Outcome<T> {
    Modified(Modification<T>),
    Failed(DiffFailure),
}

type Jobs<T> = Arc<Mutex<mpsc::Receiver<(T, T)>>>;

/// Worker pool that diffs keyed collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEngine {
    workers: usize,
}

impl DiffEngine {
    /// Create an engine with `workers` concurrent comparison workers.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `workers` is zero.
    pub fn new(workers: usize) -> Result<Self, DiffError> {
        if workers == 0 {
            return Err(DiffError::NoWorkers);
        }
        Ok(Self { workers })
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self, DiffError> {
        Self::new(config.diff_workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Compare collection `a` against collection `b`.
    ///
    /// The result does not depend on the number of workers, up to the
    /// order in which failures were produced (which is normalized by
    /// sorting).
    ///
    /// # Errors
    ///
    /// Returns `Err` if a worker or the aggregator panics.
    pub async fn diff<T: Diffable>(
        &self,
        a: &KeyedCollection<T>,
        b: &KeyedCollection<T>,
    ) -> Result<DiffResult<T>, DiffError> {
        let started = Instant::now();

        let (job_tx, job_rx) = mpsc::channel::<(T, T)>(1);
        let (result_tx, mut result_rx) = mpsc::channel::<Outcome<T>>(self.workers);

        let aggregator = tokio::spawn(async move {
            let mut modifications = Vec::new();
            let mut failures = Vec::new();
            while let Some(outcome) = result_rx.recv().await {
                match outcome {
                    Outcome::Modified(m) => modifications.push(m),
                    Outcome::Failed(f) => failures.push(f),
                }
            }
            (modifications, failures)
        });

        let jobs: Jobs<T> = Arc::new(Mutex::new(job_rx));
        let handles: Vec<_> = (0..self.workers)
            .map(|_| tokio::spawn(worker(Arc::clone(&jobs), result_tx.clone())))
            .collect();
        drop(jobs);
        drop(result_tx);

        let mut removals = Vec::new();
        let mut dispatched = 0usize;
        for (key, item) in a.iter() {
            let Some(other) = b.get(key) else {
                removals.push(item.clone());
                continue;
            };
            if !item.needs_comparison(other) {
                continue;
            }
            // Fails only once every worker is gone; the join below reports why.
            if job_tx.send((item.clone(), other.clone())).await.is_err() {
                break;
            }
            dispatched += 1;
        }
        drop(job_tx);

        let mut additions: Vec<T> = b
            .iter()
            .filter(|(key, _)| !a.contains_key(key))
            .map(|(_, item)| item.clone())
            .collect();

        for joined in join_all(handles).await {
            joined.map_err(|e| DiffError::Worker(e.to_string()))?;
        }
        let (mut modifications, mut failures) = aggregator
            .await
            .map_err(|e| DiffError::Worker(e.to_string()))?;

        additions.sort_by_cached_key(Diffable::key);
        removals.sort_by_cached_key(Diffable::key);
        modifications.sort_by_cached_key(|m| m.origin.key());
        failures.sort_by(|x, y| x.key.cmp(&y.key));

        debug!(
            workers = self.workers,
            dispatched,
            additions = additions.len(),
            removals = removals.len(),
            modifications = modifications.len(),
            failures = failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Diff complete"
        );

        Ok(DiffResult {
            additions,
            removals,
            modifications,
            failures,
        })
    }
}

async fn worker<T: Diffable>(jobs: Jobs<T>, results: mpsc::Sender<Outcome<T>>) {
    loop {
        let job = jobs.lock().await.recv().await;
        let Some((origin, other)) = job else {
            break;
        };

        let outcome = match changelog(&origin, &other) {
            Ok(changes) if changes.is_empty() && !origin.report_empty_changelog() => continue,
            Ok(changes) => Outcome::Modified(Modification { origin, changes }),
            Err(e) => Outcome::Failed(DiffFailure {
                key: origin.key(),
                error: e.to_string(),
            }),
        };

        if results.send(outcome).await.is_err() {
            break;
        }
    }
}
