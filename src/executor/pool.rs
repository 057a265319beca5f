//! Bounded worker pool
//!
//! Distributes targets to a fixed number of worker threads over a bounded
//! crossbeam channel. The channel is filled once and closed before workers
//! start draining it; worker reports flow back over a second channel to a
//! single collector, so console output never interleaves mid-line.

use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::task;
use crate::cli::Output;
use crate::resolver::Target;

/// Configuration for the worker pool
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Requested number of concurrent workers
    pub workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Shared progress state, one instance per pool run.
///
/// `total` is fixed before any worker spawns; `completed` is bumped exactly
/// once per execution attempt and can never exceed `total`.
#[derive(Debug)]
pub struct Progress {
    completed: AtomicUsize,
    total: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Record one completed execution attempt and return the new tally.
    ///
    /// A single fetch_add, so concurrent workers never lose an increment or
    /// compute overlapping progress numbers.
    pub fn record(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

/// Report sent from a worker to the collector for one target.
#[derive(Debug)]
enum TaskReport {
    /// The subprocess was attempted (successfully or not) and counted
    Completed {
        progress: usize,
        output: String,
        error: Option<String>,
    },
    /// The target vanished before dispatch; not counted
    Skipped { message: String },
}

/// Summary returned once every worker has joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionSummary {
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
}

/// Fixed-size pool of concurrent consumers of the target queue.
pub struct WorkerPool {
    config: PoolConfig,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Self {
        Self { config }
    }

    /// Clamp the requested worker count: at least one worker, at most four
    /// per available core, never more workers than targets.
    pub fn effective_workers(&self, work_count: usize) -> usize {
        let ceiling = num_cpus::get().saturating_mul(4).max(1);
        self.config.workers.clamp(1, ceiling).min(work_count.max(1))
    }

    /// Run the command template against every target, exactly once each,
    /// and return only after all workers have terminated.
    pub fn run(
        &self,
        targets: Vec<Target>,
        template: &str,
        output: &Output,
    ) -> Result<ExecutionSummary> {
        let total = targets.len();
        if total == 0 {
            return Ok(ExecutionSummary {
                total: 0,
                completed: 0,
                skipped: 0,
            });
        }

        let workers = self.effective_workers(total);
        // Total is fixed before any worker spawns, so the first progress
        // line is always consistent
        let progress = Arc::new(Progress::new(total));

        // Queue capacity equals the target count, so the single producer
        // pass below never blocks. Each target yields exactly one report,
        // so the report channel never blocks either.
        let (work_tx, work_rx): (Sender<Target>, Receiver<Target>) = bounded(total);
        let (report_tx, report_rx): (Sender<TaskReport>, Receiver<TaskReport>) = bounded(total);

        for target in targets {
            work_tx.send(target).ok();
        }
        // Close the queue: consumers detect exhaustion by emptiness plus
        // disconnection, and nothing is ever pushed after this point
        drop(work_tx);

        let summary = crossbeam::thread::scope(|s| {
            for worker_id in 0..workers {
                let work_rx = work_rx.clone();
                let report_tx = report_tx.clone();
                let progress = Arc::clone(&progress);

                s.spawn(move |_| worker_loop(worker_id, &work_rx, &report_tx, &progress, template));
            }

            // Drop the original sender so the collector sees disconnection
            // once every worker has exited its loop
            drop(report_tx);

            self.collect_reports(&report_rx, total, output)
        })
        .map_err(|_| anyhow::anyhow!("Thread panic occurred during parallel execution"))?;

        Ok(summary)
    }

    /// Consume worker reports on the calling thread; the only console
    /// writer while the pool runs.
    fn collect_reports(
        &self,
        report_rx: &Receiver<TaskReport>,
        total: usize,
        output: &Output,
    ) -> ExecutionSummary {
        let mut completed = 0;
        let mut skipped = 0;

        while let Ok(report) = report_rx.recv() {
            match report {
                TaskReport::Completed {
                    progress,
                    output: text,
                    error,
                } => {
                    completed += 1;
                    output.progress(progress, total);
                    if !text.is_empty() {
                        output.task_output(&text);
                    }
                    if let Some(err) = error {
                        output.error(&err);
                    }
                    output.separator();
                }
                TaskReport::Skipped { message } => {
                    skipped += 1;
                    output.warning(&message);
                }
            }

            if completed + skipped >= total {
                break;
            }
        }

        ExecutionSummary {
            total,
            completed,
            skipped,
        }
    }
}

/// Worker thread body: pull targets until the queue is empty and closed.
fn worker_loop(
    worker_id: usize,
    work_rx: &Receiver<Target>,
    report_tx: &Sender<TaskReport>,
    progress: &Progress,
    template: &str,
) {
    while let Ok(target) = work_rx.recv() {
        tracing::debug!("worker {} processing {}", worker_id, target.path.display());

        let report = match task::execute(&target, template) {
            Ok(outcome) => {
                // Counts whether or not the subprocess itself succeeded
                let current = progress.record();
                TaskReport::Completed {
                    progress: current,
                    output: outcome.output,
                    error: outcome
                        .error
                        .map(|e| format!("{}: {}", target.path.display(), e)),
                }
            }
            // Stat failure at dispatch time: the target is abandoned and
            // the counter is left alone, so the final completed tally may
            // fall short of the announced total
            Err(e) => TaskReport::Skipped {
                message: format!("{e:#}"),
            },
        };

        if report_tx.send(report).is_err() {
            break; // Collector dropped
        }
    }
}
