// Dweve Weft - Typed Readers for Line-Oriented Text
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Parallel parse-and-solve runs over many inputs.
//!
//! A [`BatchRunner`] owns a dedicated rayon pool with a fixed number of
//! workers. Each [`Task`] is parsed with a shared reader and the resulting
//! value handed to a solve function. Failures (parse errors, solve errors and
//! panics) are recorded per task; they never cancel sibling tasks, and the
//! [`BatchReport`] is produced only after every task has finished.
//!
//! # Examples
//!
//! ```rust
//! use weft_batch::{BatchConfig, BatchRunner, Task};
//! use weft_core::ObjectReader;
//!
//! let runner = BatchRunner::new(BatchConfig { threads: 2, ..BatchConfig::default() }).unwrap();
//! let tasks = vec![Task::new("one", "1"), Task::new("two", "2"), Task::new("bad", "x")];
//!
//! let report = runner.run(&ObjectReader::<i64>::value(), &tasks, |n| {
//!     Ok::<_, String>(n * 10)
//! });
//!
//! assert_eq!(report.success_count(), 2);
//! assert_eq!(report.outcomes()[1].result, Ok(20));
//! assert!(report.into_result().is_err());
//! ```

use crate::error::{BatchError, BatchResult};
use rayon::prelude::*;
use std::any::Any;
use std::fmt::Display;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use weft_core::{ObjectReader, ParseConfig, Parser};

/// One named input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Name used in logs and errors.
    pub name: String,
    /// Raw input text.
    pub input: String,
}

impl Task {
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
        }
    }
}

/// Configuration for batch runs.
///
/// # Examples
///
/// ```rust
/// use weft_batch::BatchConfig;
///
/// let config = BatchConfig {
///     threads: 4,
///     progress_interval: 100,
///     ..BatchConfig::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of worker threads.
    ///
    /// Default: available parallelism (1 if unknown)
    pub threads: usize,

    /// Number of finished tasks between progress events. Set to 0 to disable.
    ///
    /// Default: 1
    pub progress_interval: usize,

    /// Parse configuration applied to every task.
    pub parse: ParseConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
            progress_interval: 1,
            parse: ParseConfig::default(),
        }
    }
}

/// Result of one task.
#[derive(Debug, Clone)]
pub struct TaskOutcome<O> {
    /// Task name.
    pub name: String,
    /// Solve output, or the task failure.
    pub result: BatchResult<O>,
    /// Time spent parsing and solving.
    pub elapsed: Duration,
}

impl<O> TaskOutcome<O> {
    /// Check if the task succeeded.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Check if the task failed.
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Outcomes of a whole run, in task order.
#[derive(Debug, Clone)]
pub struct BatchReport<O> {
    outcomes: Vec<TaskOutcome<O>>,
    elapsed: Duration,
}

impl<O> BatchReport<O> {
    /// Per-task outcomes, in the order the tasks were given.
    pub fn outcomes(&self) -> &[TaskOutcome<O>] {
        &self.outcomes
    }

    /// Wall time of the run.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Check if every task succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(TaskOutcome::is_success)
    }

    /// Check if any task failed.
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(TaskOutcome::is_failure)
    }

    pub fn successes(&self) -> impl Iterator<Item = &TaskOutcome<O>> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome<O>> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Tasks per second.
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total() as f64 / secs
        }
    }

    /// All outputs in task order, or [`BatchError::Failed`] listing every
    /// failure.
    pub fn into_result(self) -> BatchResult<Vec<O>> {
        let total = self.outcomes.len();
        let mut outputs = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for outcome in self.outcomes {
            match outcome.result {
                Ok(output) => outputs.push(output),
                Err(err) => failures.push(err),
            }
        }

        if failures.is_empty() {
            Ok(outputs)
        } else {
            Err(BatchError::Failed { total, failures })
        }
    }
}

/// Lock-free progress counters for one run.
#[derive(Debug)]
struct ProgressTracker {
    total: usize,
    processed: AtomicUsize,
    failed: AtomicUsize,
    interval: usize,
}

impl ProgressTracker {
    fn new(total: usize, interval: usize) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            interval,
        }
    }

    fn record<O>(&self, outcome: &TaskOutcome<O>) {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;

        if let Err(err) = &outcome.result {
            self.failed.fetch_add(1, Ordering::Relaxed);
            warn!(
                target: "weft_batch",
                task = %outcome.name,
                error = %err,
                "task failed"
            );
        }

        if self.interval > 0 && (processed % self.interval == 0 || processed == self.total) {
            debug!(
                target: "weft_batch",
                processed,
                total = self.total,
                failed = self.failed.load(Ordering::Relaxed),
                "progress"
            );
        }
    }
}

/// One run: the shared reader, the task list and the progress collector.
struct BatchRun<'a, T, S> {
    parser: Parser<T>,
    tasks: &'a [Task],
    solve: &'a S,
    progress: ProgressTracker,
}

impl<'a, T, S, O, E> BatchRun<'a, T, S>
where
    S: Fn(T) -> Result<O, E> + Sync,
    O: Send,
    E: Display,
{
    fn execute(&self) -> Vec<TaskOutcome<O>> {
        self.tasks
            .par_iter()
            .map(|task| {
                let outcome = self.run_task(task);
                self.progress.record(&outcome);
                outcome
            })
            .collect()
    }

    fn run_task(&self, task: &Task) -> TaskOutcome<O> {
        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.parse_and_solve(task)))
            .unwrap_or_else(|payload| {
                Err(BatchError::Panicked {
                    task: task.name.clone(),
                    message: panic_message(payload.as_ref()),
                })
            });

        TaskOutcome {
            name: task.name.clone(),
            result,
            elapsed: start.elapsed(),
        }
    }

    fn parse_and_solve(&self, task: &Task) -> BatchResult<O> {
        let value = self
            .parser
            .parse_str(&task.input)
            .map_err(|source| BatchError::Parse {
                task: task.name.clone(),
                source,
            })?;

        (self.solve)(value).map_err(|e| BatchError::Solve {
            task: task.name.clone(),
            message: e.to_string(),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs parse-and-solve tasks on a fixed-size worker pool.
///
/// The pool is created once and reused by every [`run`](Self::run).
#[derive(Debug)]
pub struct BatchRunner {
    config: BatchConfig,
    pool: rayon::ThreadPool,
}

impl BatchRunner {
    /// Create a runner and its worker pool.
    pub fn new(config: BatchConfig) -> BatchResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads.max(1))
            .thread_name(|i| format!("weft-worker-{}", i))
            .build()
            .map_err(|e| BatchError::Pool(e.to_string()))?;

        Ok(Self { config, pool })
    }

    /// Runner configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Number of workers in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Parse every task with `reader` and pass the value to `solve`.
    ///
    /// Always runs every task; inspect the report or call
    /// [`BatchReport::into_result`] to surface failures.
    pub fn run<T, S, O, E>(
        &self,
        reader: &ObjectReader<T>,
        tasks: &[Task],
        solve: S,
    ) -> BatchReport<O>
    where
        S: Fn(T) -> Result<O, E> + Sync,
        O: Send,
        E: Display,
    {
        let start = Instant::now();
        let run = BatchRun {
            parser: Parser::with_config(reader.clone(), self.config.parse.clone()),
            tasks,
            solve: &solve,
            progress: ProgressTracker::new(tasks.len(), self.config.progress_interval),
        };

        let outcomes = self.pool.install(|| run.execute());
        let report = BatchReport {
            outcomes,
            elapsed: start.elapsed(),
        };

        info!(
            target: "weft_batch",
            reader = reader.shape_name(),
            total = report.total(),
            succeeded = report.success_count(),
            failed = report.failure_count(),
            duration_ms = report.elapsed.as_secs_f64() * 1000.0,
            "batch completed"
        );
        report
    }
}
