//! Launches worker threads against a [`SharedCounter`] and waits for them.

use crate::config::RunConfig;
use crate::counter::SharedCounter;
use crate::error::{CounterError, Result};
use crate::observer::IncrementObserver;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub workers: usize,
    pub increments_per_worker: usize,
    pub expected: i64,
    pub final_count: i64,
}

impl RunReport {
    /// True when no increment was lost or counted twice.
    pub fn is_consistent(&self) -> bool {
        self.expected == self.final_count
    }
}

fn work(counter: &SharedCounter, increments: usize, observer: &dyn IncrementObserver) {
    for _ in 0..increments {
        counter.increment_observed(observer);
    }
}

/// Runs the configured workers on borrowed scoped threads.
///
/// The scope joins every worker before returning, so `counter` is guaranteed
/// to outlive all of them. The final value is read only after the last join.
pub fn run(
    counter: &SharedCounter,
    config: &RunConfig,
    observer: &dyn IncrementObserver,
) -> Result<RunReport> {
    config.validate()?;
    let expected = config.expected_total()?;
    let increments = config.increments_per_worker;

    thread::scope(|s| {
        let mut handles = Vec::with_capacity(config.workers);
        let mut spawn_error = None;
        for worker in 0..config.workers {
            let spawned = thread::Builder::new()
                .name(format!("worker-{}", worker))
                .spawn_scoped(s, move || {
                    log::debug!("worker {} starting", worker);
                    work(counter, increments, observer);
                    log::debug!("worker {} done", worker);
                });
            match spawned {
                Ok(handle) => handles.push((worker, handle)),
                Err(source) => {
                    spawn_error = Some(CounterError::Spawn { worker, source });
                    break;
                }
            }
        }
        let joined = handles.into_iter().map(|(w, h)| (w, h.join()));
        settle(joined, spawn_error)
    })?;

    Ok(report(config, expected, counter.read()))
}

/// Same as [`run`], but every worker owns an `Arc` to the counter and runs
/// on a `'static` thread. All of them are joined before returning.
pub fn run_shared<O>(
    counter: Arc<SharedCounter>,
    config: &RunConfig,
    observer: Arc<O>,
) -> Result<RunReport>
where
    O: IncrementObserver + Send + 'static,
{
    config.validate()?;
    let expected = config.expected_total()?;

    let mut handles = Vec::with_capacity(config.workers);
    let mut spawn_error = None;
    for worker in 0..config.workers {
        let counter = Arc::clone(&counter);
        let observer = Arc::clone(&observer);
        let increments = config.increments_per_worker;
        let spawned = thread::Builder::new()
            .name(format!("worker-{}", worker))
            .spawn(move || work(&counter, increments, observer.as_ref()));
        match spawned {
            Ok(handle) => handles.push((worker, handle)),
            Err(source) => {
                spawn_error = Some(CounterError::Spawn { worker, source });
                break;
            }
        }
    }
    settle(handles.into_iter().map(|(w, h)| (w, h.join())), spawn_error)?;

    Ok(report(config, expected, counter.read()))
}

// Joins every worker that was started before looking at any result, so
// nothing is still running when this returns. A failed spawn wins over a
// panicked worker.
fn settle<I, E>(joined: I, spawn_error: Option<CounterError>) -> Result<()>
where
    I: Iterator<Item = (usize, std::result::Result<(), E>)>,
{
    let results: Vec<_> = joined.collect();
    if let Some(err) = spawn_error {
        return Err(err);
    }
    match results
        .into_iter()
        .find_map(|(worker, result)| result.is_err().then_some(worker))
    {
        Some(worker) => Err(CounterError::WorkerPanicked { worker }),
        None => Ok(()),
    }
}

fn report(config: &RunConfig, expected: i64, final_count: i64) -> RunReport {
    let report = RunReport {
        workers: config.workers,
        increments_per_worker: config.increments_per_worker,
        expected,
        final_count,
    };
    log::info!(
        "{} workers x {} increments: final count {} (expected {})",
        report.workers,
        report.increments_per_worker,
        report.final_count,
        report.expected
    );
    report
}
