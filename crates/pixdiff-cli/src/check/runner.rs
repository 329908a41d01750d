use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use pixdiff::Palette;
use tokio::sync::{Mutex, mpsc};
use tracing::{Instrument, debug, info_span, warn};

use super::diff::{PairResult, check_pair};
use crate::store::Store;

/// Per-snapshot check outcome.
pub enum CheckOutcome {
    Done(PairResult, Duration),
    /// No reference exists for this ID.
    New,
    Err(String),
}

/// Read both sides of one ID and compare them. Blocking.
fn check_one(store: &Store, id: &str, palette: &Palette) -> Result<CheckOutcome> {
    let Some(reference) = store.read_reference(id)? else {
        return Ok(CheckOutcome::New);
    };
    let current = store
        .read_current(id)?
        .with_context(|| format!("current/{id}.png disappeared"))?;

    let start = Instant::now();
    let result = check_pair(&reference, &current, palette)?;
    Ok(CheckOutcome::Done(result, start.elapsed()))
}

/// Check every ID with a pool of `parallel` workers sharing one queue.
///
/// Individual failures are reported per-snapshot rather than aborting the run.
/// Returns a `Receiver` immediately — results stream in as checks complete.
pub fn check_all(
    store: Arc<Store>,
    ids: Vec<String>,
    palette: Palette,
    parallel: usize,
) -> mpsc::Receiver<(String, CheckOutcome)> {
    let job_count = ids.len();
    let worker_count = job_count.min(parallel.max(1));
    debug!(
        jobs = job_count,
        workers = worker_count,
        parallel,
        "starting check run"
    );

    let queue = Arc::new(Mutex::new(ids));
    let (tx, rx) = mpsc::channel(parallel.max(1) * 2);

    let mut set = tokio::task::JoinSet::new();
    for idx in 0..worker_count {
        let queue = queue.clone();
        let tx = tx.clone();
        let store = store.clone();
        let span = info_span!("worker", id = idx);
        set.spawn(
            async move {
                debug!("started");
                loop {
                    let (id, remaining) = {
                        let mut q = queue.lock().await;
                        match q.pop() {
                            Some(id) => {
                                let remaining = q.len();
                                (id, remaining)
                            }
                            None => {
                                debug!("queue empty, exiting");
                                break;
                            }
                        }
                    };
                    debug!(job = %id, remaining, "picked job");

                    let store = store.clone();
                    let job = id.clone();
                    let outcome = match tokio::task::spawn_blocking(move || {
                        check_one(&store, &job, &palette)
                    })
                    .await
                    {
                        Ok(Ok(outcome)) => outcome,
                        Ok(Err(e)) => {
                            warn!(job = %id, error = %format!("{e:#}"), "check failed");
                            CheckOutcome::Err(format!("{e:#}"))
                        }
                        Err(e) => {
                            warn!(job = %id, error = %e, "check task panicked");
                            CheckOutcome::Err("Diff task panicked".into())
                        }
                    };

                    if tx.send((id, outcome)).await.is_err() {
                        warn!("channel send failed (receiver dropped), stopping");
                        break;
                    }
                }
                debug!("exiting");
            }
            .instrument(span),
        );
    }

    // Channel closes once every worker's sender is gone.
    drop(tx);

    tokio::spawn(async move {
        while let Some(result) = set.join_next().await {
            match result {
                Ok(()) => debug!("worker task joined"),
                Err(e) => warn!(error = %e, "worker task panicked"),
            }
        }
        debug!("all workers done");
    });

    rx
}
