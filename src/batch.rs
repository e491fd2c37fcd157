//! Sequential batch runs over an ordered list of records.
//!
//! Records are attempted strictly in input order on the calling thread.
//! Cancellation is cooperative and only checked between records; a search in
//! progress always finishes and its outcome is kept.

use crate::session::{SearchOutcome, SearchRecord, Searcher};
use crate::trace::{trace_event, trace_span};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared cancellation flag for a batch run on a worker thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the run stop before its next record.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Progress notification sent after each attempted record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchProgress {
    /// Records attempted so far, including this one.
    pub completed: usize,
    pub total: usize,
    pub outcome: SearchOutcome,
}

/// Batch pacing policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Grace period before the first record, so the operator can bring the
    /// target window to the front. Cancellation is honoured during the wait.
    pub start_delay: Duration,
    /// Wait after each non-final record so the target UI can settle.
    pub record_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            start_delay: Duration::from_secs(5),
            record_delay: Duration::from_millis(200),
        }
    }
}

impl BatchConfig {
    /// Same policy with no start or inter-record waits.
    pub fn without_delays(mut self) -> Self {
        self.start_delay = Duration::ZERO;
        self.record_delay = Duration::ZERO;
        self
    }
}

const START_POLL: Duration = Duration::from_millis(100);

/// Tally of a finished or cancelled run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    /// Summarizes `outcomes` produced from `total` input records.
    pub fn from_outcomes(total: usize, outcomes: &[SearchOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            total,
            attempted: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
            cancelled: outcomes.len() < total,
        }
    }
}

/// Runs a [`Searcher`] over records in order.
pub struct BatchRunner<S> {
    searcher: S,
    cfg: BatchConfig,
}

impl<S: Searcher> BatchRunner<S> {
    pub fn new(searcher: S) -> Self {
        Self {
            searcher,
            cfg: BatchConfig::default(),
        }
    }

    pub fn with_config(mut self, cfg: BatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Runs every record with no progress reporting or cancellation.
    pub fn run_all(&mut self, records: &[SearchRecord]) -> Vec<SearchOutcome> {
        self.run(records, |_| {}, || false)
    }

    /// Attempts records in order and returns one outcome per attempted record.
    ///
    /// `is_cancelled` is polled during the start delay and before each record;
    /// once it returns true no further record is attempted. `on_progress` runs synchronously after
    /// each attempt.
    pub fn run<P, F>(
        &mut self,
        records: &[SearchRecord],
        mut on_progress: P,
        is_cancelled: F,
    ) -> Vec<SearchOutcome>
    where
        P: FnMut(&BatchProgress),
        F: Fn() -> bool,
    {
        let total = records.len();
        let _span = trace_span!("batch", total = total).entered();
        trace_event!("batch_started", total = total);

        if total > 0 && !self.cfg.start_delay.is_zero() {
            let millis = self.cfg.start_delay.as_millis() as u64;
            trace_event!("batch_start_delay", millis = millis);
            let mut left = self.cfg.start_delay;
            while !left.is_zero() && !is_cancelled() {
                let step = left.min(START_POLL);
                std::thread::sleep(step);
                left -= step;
            }
        }

        let mut outcomes = Vec::with_capacity(total);
        for (idx, record) in records.iter().enumerate() {
            if is_cancelled() {
                trace_event!("batch_cancelled", completed = idx, total = total);
                break;
            }

            let outcome = self.searcher.search(&record.identifier);
            let completed = idx + 1;
            trace_event!(
                "batch_progress",
                completed = completed,
                total = total,
                success = outcome.is_success(),
                count = outcome.count
            );
            on_progress(&BatchProgress {
                completed,
                total,
                outcome: outcome.clone(),
            });
            outcomes.push(outcome);

            if completed < total && !self.cfg.record_delay.is_zero() {
                std::thread::sleep(self.cfg.record_delay);
            }
        }

        let summary = BatchSummary::from_outcomes(total, &outcomes);
        trace_event!(
            "batch_finished",
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed
        );
        outcomes
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    pub fn searcher_mut(&mut self) -> &mut S {
        &mut self.searcher
    }

    pub fn into_searcher(self) -> S {
        self.searcher
    }
}

#[cfg(test)]
mod tests {
    use super::{BatchConfig, BatchRunner, BatchSummary, CancelToken};
    use crate::session::{SearchOutcome, SearchRecord, Searcher};
    use std::time::{Duration, Instant};

    struct Echo;

    impl Searcher for Echo {
        fn search(&mut self, identifier: &str) -> SearchOutcome {
            SearchOutcome::success(identifier, 1)
        }
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn summary_flags_short_runs_as_cancelled() {
        let outcomes = vec![
            SearchOutcome::success("a", 2),
            SearchOutcome::error("b", "template not found"),
        ];
        let summary = BatchSummary::from_outcomes(5, &outcomes);
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(summary.cancelled);
        assert!(!BatchSummary::from_outcomes(2, &outcomes).cancelled);
    }

    #[test]
    fn start_delay_precedes_first_record() {
        let cfg = BatchConfig {
            start_delay: Duration::from_millis(40),
            ..BatchConfig::default().without_delays()
        };
        let mut runner = BatchRunner::new(Echo).with_config(cfg);
        let started = Instant::now();
        let outcomes = runner.run_all(&[SearchRecord::new("a")]);
        assert!(started.elapsed() >= Duration::from_millis(40));
        assert_eq!(outcomes.len(), 1);
    }

    #[test]
    fn cancel_during_start_delay_attempts_nothing() {
        let cfg = BatchConfig {
            start_delay: Duration::from_secs(30),
            ..BatchConfig::default().without_delays()
        };
        let mut runner = BatchRunner::new(Echo).with_config(cfg);
        let started = Instant::now();
        let outcomes = runner.run(&[SearchRecord::new("a")], |_| {}, || true);
        assert!(outcomes.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
